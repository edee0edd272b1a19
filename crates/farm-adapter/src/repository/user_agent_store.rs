//! FileUserAgentStore - One stable user agent per session
//!
//! The cache is a JSON object mapping session key to user agent. Workers
//! share one store, so every lookup is a read-modify-write under a lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use farm_usecase::UserAgentStore;
use rand::seq::SliceRandom;
use shared::FarmError;
use tokio::sync::Mutex;
use tracing::info;

type AgentMap = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileUserAgentStore {
    path: PathBuf,
    agents: Vec<String>,
    lock: Mutex<()>,
}

impl FileUserAgentStore {
    pub fn new(path: impl Into<PathBuf>, agents: Vec<String>) -> Self {
        Self {
            path: path.into(),
            agents,
            lock: Mutex::new(()),
        }
    }

    fn pick(&self) -> Result<String, FarmError> {
        self.agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| FarmError::Config("user_agents must not be empty".into()))
    }
}

#[async_trait]
impl UserAgentStore for FileUserAgentStore {
    async fn user_agent_for(&self, session_key: &str) -> shared::Result<String> {
        let _guard = self.lock.lock().await;

        let mut map = load(&self.path)?;
        if let Some(agent) = map.get(session_key) {
            return Ok(agent.clone());
        }

        let agent = self.pick()?;
        map.insert(session_key.to_string(), agent.clone());
        save(&self.path, &map)?;
        info!("New user agent assigned to session {}", session_key);
        Ok(agent)
    }
}

fn load(path: &Path) -> Result<AgentMap, FarmError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(AgentMap::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentMap::new()),
        Err(e) => Err(e.into()),
    }
}

fn save(path: &Path, map: &AgentMap) -> Result<(), FarmError> {
    let content = serde_json::to_string_pretty(map)?;
    std::fs::write(path, content)?;
    Ok(())
}
