//! Game API client - Transport, retries and status classification
//!
//! Every response is turned into a tagged result exactly once, here:
//!
//! | status      | outcome                                   |
//! |-------------|-------------------------------------------|
//! | 2xx         | body, unwrapped from `{"result": ...}`    |
//! | 401 / 403   | `Unauthorized`, no retry                  |
//! | 400         | `BadRequest`, no retry                    |
//! | 429         | long backoff, then retry                  |
//! | other/none  | short random delay, then retry            |

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{ApiError, FarmError, Pacing};
use tracing::{debug, error, warn};

use crate::random::jitter;

const INIT_DATA_HEADER: &str = "tg-init-data";
const IP_CHECK_URL: &str = "https://api.ipify.org?format=json";

/// Everything needed to build a client for one account
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Raw Telegram init-data query
    pub init_data: String,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    /// Retries after the first attempt
    pub retries: u32,
    pub pacing: Pacing,
}

/// Per-call overrides
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    pub retries: Option<u32>,
    /// Attach the init-data credential
    pub authenticated: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            retries: None,
            authenticated: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Success,
    Unauthorized,
    Rejected,
    RateLimited,
    Retry,
}

/// Decide what a status means; `None` is a transport failure
pub(crate) fn classify(status: Option<u16>) -> Verdict {
    match status {
        Some(s) if (200..300).contains(&s) => Verdict::Success,
        Some(401) | Some(403) => Verdict::Unauthorized,
        Some(400) => Verdict::Rejected,
        Some(429) => Verdict::RateLimited,
        _ => Verdict::Retry,
    }
}

/// Decode a success body, unwrapping a non-null `result` envelope
pub(crate) fn decode_body<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    let decode_error = |e: serde_json::Error| ApiError::Decode {
        path: path.to_string(),
        detail: e.to_string(),
    };

    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(decode_error)?
    };

    let inner = match value {
        Value::Object(mut map) => match map.remove("result") {
            Some(result) if !result.is_null() => result,
            Some(result) => {
                map.insert("result".to_string(), result);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };

    serde_json::from_value(inner).map_err(decode_error)
}

/// Platform hint for the client-hint headers
pub(crate) fn detect_platform(user_agent: &str) -> &'static str {
    let patterns = [(r"(?i)iPhone|iPad", "ios"), (r"(?i)Android", "android")];
    patterns
        .iter()
        .find(|(pattern, _)| {
            regex::Regex::new(pattern)
                .map(|r| r.is_match(user_agent))
                .unwrap_or(false)
        })
        .map(|(_, platform)| *platform)
        .unwrap_or("Unknown")
}

fn default_headers(user_agent: &str) -> Result<HeaderMap, FarmError> {
    let platform = detect_platform(user_agent);
    let header = |value: String| {
        HeaderValue::from_str(&value)
            .map_err(|e| FarmError::Config(format!("invalid header value {:?}: {}", value, e)))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header(user_agent.to_string())?);
    headers.insert(
        "sec-ch-ua",
        header(format!(
            "\"Not)A;Brand\";v=\"99\", \"{} WebView\";v=\"127\", \"Chromium\";v=\"127\"",
            platform
        ))?,
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?1"));
    headers.insert("sec-ch-ua-platform", header(format!("\"{}\"", platform))?);
    Ok(headers)
}

fn build_http(
    headers: Option<HeaderMap>,
    proxy: Option<&str>,
    timeout: Duration,
) -> Result<Client, FarmError> {
    let mut builder = Client::builder().timeout(timeout);
    if let Some(headers) = headers {
        builder = builder.default_headers(headers);
    }
    if let Some(proxy) = proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| FarmError::Config(format!("invalid proxy {}: {}", proxy, e)))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| FarmError::Other(format!("failed to build HTTP client: {}", e)))
}

/// HTTP client bound to one account
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    init_data: String,
    retries: u32,
    pacing: Pacing,
}

impl ApiClient {
    pub fn new(options: ClientOptions) -> Result<Self, FarmError> {
        let headers = default_headers(&options.user_agent)?;
        let http = build_http(Some(headers), options.proxy.as_deref(), options.timeout)?;
        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            init_data: options.init_data,
            retries: options.retries,
            pacing: options.pacing,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, RequestOptions::default())
            .await
    }

    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            detail: format!("payload: {}", e),
        })?;
        self.request(Method::POST, path, Some(payload), RequestOptions::default())
            .await
    }

    /// Send one call, retrying per the status table above
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let retries = options.retries.unwrap_or(self.retries);
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = ApiError::Transport {
            path: path.to_string(),
            status: None,
            detail: "no attempt made".to_string(),
        };

        for attempt in 0..=retries {
            debug!(%method, path, attempt, "request");
            let (status, body) = self
                .send_once(method.clone(), &url, payload.as_ref(), options.authenticated)
                .await;

            match classify(status) {
                Verdict::Success => return decode_body(path, &body),
                Verdict::Unauthorized => {
                    error!(path, ?status, "Unauthorized, init data must be refreshed");
                    return Err(ApiError::Unauthorized {
                        status: status.unwrap_or(401),
                    });
                }
                Verdict::Rejected => {
                    error!(path, body = %body, "Invalid request, the server may have been updated");
                    return Err(ApiError::BadRequest {
                        path: path.to_string(),
                        detail: body,
                    });
                }
                Verdict::RateLimited => {
                    warn!(path, "Rate limited, backing off");
                    tokio::time::sleep(self.pacing.rate_limit_backoff()).await;
                    last_error = ApiError::RateLimited {
                        path: path.to_string(),
                    };
                }
                Verdict::Retry => {
                    error!(path, ?status, body = %body, "Request failed");
                    last_error = ApiError::Transport {
                        path: path.to_string(),
                        status,
                        detail: body,
                    };
                }
            }

            if attempt < retries {
                tokio::time::sleep(jitter(self.pacing.request_delay_secs)).await;
            }
        }

        Err(last_error)
    }

    /// One HTTP exchange as (status, body); transport errors have no status
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        payload: Option<&Value>,
        authenticated: bool,
    ) -> (Option<u16>, String) {
        let mut request = self.http.request(method.clone(), url);
        if authenticated {
            request = request.header(INIT_DATA_HEADER, &self.init_data);
        }
        if method != Method::GET {
            if let Some(payload) = payload {
                request = request.json(payload);
            }
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => (Some(status), body),
                    Err(e) => (None, format!("failed to read body: {}", e)),
                }
            }
            Err(e) => (e.status().map(|s| s.as_u16()), e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpInfo {
    ip: String,
}

/// Public IP seen through `proxy`
pub async fn check_proxy_ip(proxy: &str, timeout: Duration) -> Result<String, FarmError> {
    let http = build_http(None, Some(proxy), timeout)?;
    let response = http
        .get(IP_CHECK_URL)
        .send()
        .await
        .map_err(|e| FarmError::Other(format!("cannot check proxy IP: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FarmError::Other(format!(
            "cannot check proxy IP, status code: {}",
            status
        )));
    }

    let info: IpInfo = response
        .json()
        .await
        .map_err(|e| FarmError::Other(format!("cannot check proxy IP: {}", e)))?;
    Ok(info.ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(classify(Some(200)), Verdict::Success);
        assert_eq!(classify(Some(201)), Verdict::Success);
        assert_eq!(classify(Some(401)), Verdict::Unauthorized);
        assert_eq!(classify(Some(403)), Verdict::Unauthorized);
        assert_eq!(classify(Some(400)), Verdict::Rejected);
        assert_eq!(classify(Some(429)), Verdict::RateLimited);
        assert_eq!(classify(Some(500)), Verdict::Retry);
        assert_eq!(classify(Some(404)), Verdict::Retry);
        assert_eq!(classify(None), Verdict::Retry);
    }

    #[test]
    fn test_decode_unwraps_result_envelope() {
        let value: Vec<u32> = decode_body("/x", r#"{"result": [1, 2, 3]}"#).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_keeps_plain_bodies() {
        let value: Value = decode_body("/x", r#"{"ok": true}"#).unwrap();
        assert_eq!(value, json!({"ok": true}));

        let value: Value = decode_body("/x", r#"{"result": null, "error_code": "E1"}"#).unwrap();
        assert_eq!(value, json!({"result": null, "error_code": "E1"}));

        let empty: Value = decode_body("/x", "  ").unwrap();
        assert_eq!(empty, Value::Null);
    }

    #[test]
    fn test_decode_error_is_tagged() {
        let result: Result<Vec<u32>, ApiError> = decode_body("/public/pet/list", "<html>");
        match result {
            Err(ApiError::Decode { path, .. }) => assert_eq!(path, "/public/pet/list"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_detect_platform() {
        assert_eq!(detect_platform("Mozilla/5.0 (iPhone; CPU iPhone OS 17_5)"), "ios");
        assert_eq!(detect_platform("Mozilla/5.0 (iPad; CPU OS 17_4)"), "ios");
        assert_eq!(detect_platform("Mozilla/5.0 (Linux; Android 14; SM-S918B)"), "android");
        assert_eq!(detect_platform("curl/8.0"), "Unknown");
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers("Mozilla/5.0 (Linux; Android 13; Pixel 7)").unwrap();
        assert_eq!(headers["sec-ch-ua-platform"], "\"android\"");
        assert!(headers["sec-ch-ua"].to_str().unwrap().contains("android WebView"));
        assert!(headers.get(INIT_DATA_HEADER).is_none());
    }

    #[test]
    fn test_client_rejects_bad_proxy() {
        let result = ApiClient::new(ClientOptions {
            base_url: "https://example.invalid/".into(),
            init_data: "query_id=1".into(),
            user_agent: "curl/8.0".into(),
            proxy: Some("http://[::1".into()),
            timeout: Duration::from_secs(5),
            retries: 0,
            pacing: Pacing::immediate(),
        });
        assert!(matches!(result, Err(FarmError::Config(_))));
    }
}
