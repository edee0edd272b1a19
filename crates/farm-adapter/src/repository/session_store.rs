//! FileSessionStore - Accounts from `data.txt`, proxies from `proxy.txt`

use std::path::{Path, PathBuf};

use farm_domain::AccountSession;
use reqwest::Url;
use serde::Deserialize;
use shared::FarmError;
use tracing::warn;

/// The `user` field embedded in Telegram init data
#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: u64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

/// Line-oriented account and proxy files
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    data_file: PathBuf,
    proxy_file: PathBuf,
}

impl FileSessionStore {
    pub fn new(data_file: impl Into<PathBuf>, proxy_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            proxy_file: proxy_file.into(),
        }
    }

    /// Proxy URLs in file order
    pub fn load_proxies(&self) -> Result<Vec<String>, FarmError> {
        read_lines(&self.proxy_file)
    }

    /// Accounts in file order
    ///
    /// Account `i` gets proxy `i % proxies.len()` when `proxies` is non-empty.
    pub fn load_accounts(&self, proxies: &[String]) -> Result<Vec<AccountSession>, FarmError> {
        read_lines(&self.data_file)?
            .into_iter()
            .enumerate()
            .map(|(index, init_data)| -> Result<AccountSession, FarmError> {
                let user = parse_user(&init_data).map_err(|reason| {
                    FarmError::Session(format!("line {} of {}: {}", index + 1, self.data_file.display(), reason))
                })?;
                let proxy = if proxies.is_empty() {
                    None
                } else {
                    Some(proxies[index % proxies.len()].clone())
                };
                Ok(AccountSession {
                    index,
                    user_id: user.id,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    init_data,
                    proxy,
                })
            })
            .collect()
    }
}

/// Non-empty lines with carriage returns stripped; a missing file reads as empty
fn read_lines(path: &Path) -> Result<Vec<String>, FarmError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("File not found {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<String> = content
        .replace('\r', "")
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect();
    if lines.is_empty() {
        warn!("No data found {}", path.display());
    }
    Ok(lines)
}

fn parse_user(init_data: &str) -> Result<TelegramUser, String> {
    let url = Url::parse(&format!("https://session.local/?{}", init_data))
        .map_err(|e| e.to_string())?;
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| "missing user field".to_string())?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid user field: {}", e))
}
