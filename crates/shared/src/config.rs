//! Configuration types for the farm

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Inclusive range of seconds, written as `[min, max]` in YAML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Bounds with `min <= max` regardless of how they were written
    pub fn bounds(&self) -> (u64, u64) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

impl From<[u64; 2]> for DelayRange {
    fn from([min, max]: [u64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<DelayRange> for [u64; 2] {
    fn from(range: DelayRange) -> Self {
        [range.min, range.max]
    }
}

/// Delays inserted between calls to keep the request rate human-like
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Pause between the steps of one account cycle
    pub step_delay_secs: u64,
    /// Pause between individual submissions (claims, joins, mixes)
    pub submit_delay_secs: u64,
    /// Pause between PVP attacks
    pub attack_delay_secs: u64,
    /// Pause before each gacha draw
    pub gacha_delay_secs: u64,
    /// Randomised pause before a transport retry
    pub request_delay_secs: DelayRange,
    /// Extra pause after a 429
    pub rate_limit_backoff_secs: u64,
    /// Randomised start offset per account when proxies are used
    pub start_delay_secs: DelayRange,
    /// Pause between worker batches
    pub batch_pause_secs: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step_delay_secs: 2,
            submit_delay_secs: 1,
            attack_delay_secs: 15,
            gacha_delay_secs: 2,
            request_delay_secs: DelayRange::new(1, 5),
            rate_limit_backoff_secs: 60,
            start_delay_secs: DelayRange::new(10, 30),
            batch_pause_secs: 3,
        }
    }
}

impl Pacing {
    /// Pacing with every delay set to zero
    pub fn immediate() -> Self {
        Self {
            step_delay_secs: 0,
            submit_delay_secs: 0,
            attack_delay_secs: 0,
            gacha_delay_secs: 0,
            request_delay_secs: DelayRange::new(0, 0),
            rate_limit_backoff_secs: 0,
            start_delay_secs: DelayRange::new(0, 0),
            batch_pause_secs: 0,
        }
    }

    pub fn step(&self) -> Duration {
        Duration::from_secs(self.step_delay_secs)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_secs(self.submit_delay_secs)
    }

    pub fn attack(&self) -> Duration {
        Duration::from_secs(self.attack_delay_secs)
    }

    pub fn gacha(&self) -> Duration {
        Duration::from_secs(self.gacha_delay_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_secs)
    }
}

/// Top-level farm configuration (`config.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Game API root
    pub base_url: String,
    /// One Telegram init-data query per line
    pub data_file: PathBuf,
    /// One proxy URL per line
    pub proxy_file: PathBuf,
    /// JSON map of session id to user agent
    pub user_agent_cache: PathBuf,
    pub missions_catalog: PathBuf,
    pub pets_catalog: PathBuf,

    pub use_proxy: bool,
    pub max_threads: usize,
    pub max_threads_no_proxy: usize,

    /// Upper bound on gacha pulls per currency per cycle
    pub max_amount_gacha: u32,
    pub auto_claim_bonus: bool,
    pub auto_merge_pet: bool,
    /// Breed only pairs that complete an unfinished collection
    pub enable_advanced_merge: bool,
    pub auto_pvp: bool,

    /// DNA item ids or names never used for breeding
    pub skip_pets_dna: Vec<String>,
    /// Mission ids and quest codes never claimed
    pub skip_tasks: Vec<String>,
    /// Mission ids never entered
    pub skip_missions: Vec<u64>,
    /// Clan to join each cycle, if any
    pub clan_id: Option<u64>,

    /// Cooldown between full passes over all accounts
    pub time_sleep_minutes: u64,
    /// Hard limit on one account run
    pub account_timeout_hours: u64,
    /// Transport retries after the first attempt
    pub retries: u32,
    pub request_timeout_secs: u64,
    /// Pool of user agents assigned to new sessions
    pub user_agents: Vec<String>,

    pub pacing: Pacing,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pro-api.animix.tech".to_string(),
            data_file: PathBuf::from("data.txt"),
            proxy_file: PathBuf::from("proxy.txt"),
            user_agent_cache: PathBuf::from("session_user_agents.json"),
            missions_catalog: PathBuf::from("missions.json"),
            pets_catalog: PathBuf::from("pets.json"),
            use_proxy: false,
            max_threads: 10,
            max_threads_no_proxy: 10,
            max_amount_gacha: 100,
            auto_claim_bonus: true,
            auto_merge_pet: true,
            enable_advanced_merge: false,
            auto_pvp: true,
            skip_pets_dna: Vec::new(),
            skip_tasks: Vec::new(),
            skip_missions: Vec::new(),
            clan_id: None,
            time_sleep_minutes: 60,
            account_timeout_hours: 24,
            retries: 1,
            request_timeout_secs: 120,
            user_agents: default_user_agents(),
            pacing: Pacing::default(),
        }
    }
}

impl FarmConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject settings the runner cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(crate::FarmError::Config("base_url must not be empty".into()));
        }
        if self.max_threads == 0 || self.max_threads_no_proxy == 0 {
            return Err(crate::FarmError::Config(
                "max_threads and max_threads_no_proxy must be at least 1".into(),
            ));
        }
        if self.user_agents.is_empty() {
            return Err(crate::FarmError::Config("user_agents must not be empty".into()));
        }
        Ok(())
    }

    /// Number of accounts processed concurrently
    pub fn worker_limit(&self) -> usize {
        if self.use_proxy {
            self.max_threads
        } else {
            self.max_threads_no_proxy
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.time_sleep_minutes * 60)
    }

    pub fn account_timeout(&self) -> Duration {
        Duration::from_secs(self.account_timeout_hours * 60 * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
        "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
        "Mozilla/5.0 (Linux; Android 14; SM-S918B Build/UP1A.231005.007; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/127.0.6533.103 Mobile Safari/537.36",
        "Mozilla/5.0 (Linux; Android 13; Pixel 7 Build/TQ3A.230805.001; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/127.0.6533.103 Mobile Safari/537.36",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_partial() {
        let yaml = r#"
use_proxy: true
max_threads: 4
skip_missions: [12, 40]
pacing:
  attack_delay_secs: 5
  request_delay_secs: [2, 3]
"#;

        let config: FarmConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.use_proxy);
        assert_eq!(config.worker_limit(), 4);
        assert_eq!(config.skip_missions, vec![12, 40]);
        assert_eq!(config.pacing.attack_delay_secs, 5);
        assert_eq!(config.pacing.request_delay_secs, DelayRange::new(2, 3));
        // untouched fields keep their defaults
        assert_eq!(config.pacing.step_delay_secs, 2);
        assert_eq!(config.account_timeout_hours, 24);
    }

    #[test]
    fn test_worker_limit_without_proxy() {
        let config = FarmConfig {
            max_threads: 3,
            max_threads_no_proxy: 7,
            ..Default::default()
        };
        assert_eq!(config.worker_limit(), 7);
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = FarmConfig {
            max_threads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FarmConfig::load_or_default(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.max_amount_gacha, 100);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "auto_pvp: false\nclan_id: 4463\n").unwrap();

        let config = FarmConfig::from_file(&path).unwrap();
        assert!(!config.auto_pvp);
        assert_eq!(config.clan_id, Some(4463));
    }

    #[test]
    fn test_delay_range_bounds_are_ordered() {
        assert_eq!(DelayRange::new(5, 1).bounds(), (1, 5));
        assert_eq!(DelayRange::new(1, 5).bounds(), (1, 5));
    }
}
