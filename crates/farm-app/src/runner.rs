//! Runner - Batches accounts over worker tasks and loops forever
//!
//! ```text
//! ┌──────────── pass ────────────┐
//! │ batch 1 ─▶ pause ─▶ batch 2 … │ ─▶ cooldown ─▶ next pass
//! └──────────────────────────────┘
//! ```
//!
//! Each account runs in its own task under a hard timeout; one account
//! failing never stops the others.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use farm_adapter::{
    check_proxy_ip, jitter, ApiClient, CatalogLoader, ClientOptions, FileSessionStore,
    FileUserAgentStore, HttpGameGateway, RandomPicker,
};
use farm_domain::AccountSession;
use farm_usecase::{AccountCycle, Catalogs, CycleReport, CycleSettings, Pacer, UserAgentStore};
use indicatif::{ProgressBar, ProgressStyle};
use shared::{FarmConfig, FarmError};
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument, Span};

/// Everything loaded at start-up, shared read-only by all workers
pub struct Runner {
    config: Arc<FarmConfig>,
    catalogs: Arc<Catalogs>,
    settings: Arc<CycleSettings>,
    agents: Arc<FileUserAgentStore>,
    accounts: Vec<AccountSession>,
}

/// Outcome counts for one pass over all accounts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl Runner {
    /// Load catalogs and accounts and run the start-up checks
    pub fn prepare(config: FarmConfig) -> anyhow::Result<Self> {
        let loader = CatalogLoader::new();
        let catalogs = Catalogs {
            missions: loader
                .load_missions(&config.missions_catalog)
                .context("loading mission catalog")?,
            pets: loader
                .load_pets(&config.pets_catalog)
                .context("loading pet catalog")?,
        };

        let store = FileSessionStore::new(&config.data_file, &config.proxy_file);
        let proxies = store.load_proxies()?;
        let assigned: &[String] = if config.use_proxy { &proxies } else { &[] };
        let accounts = store.load_accounts(assigned)?;
        check_accounts(accounts.len(), proxies.len(), config.use_proxy)?;

        if !config.use_proxy {
            warn!("You are running bot without proxies!!!");
        }

        let agents = FileUserAgentStore::new(&config.user_agent_cache, config.user_agents.clone());
        Ok(Self {
            settings: Arc::new(CycleSettings::from(&config)),
            catalogs: Arc::new(catalogs),
            agents: Arc::new(agents),
            config: Arc::new(config),
            accounts,
        })
    }

    pub fn accounts(&self) -> &[AccountSession] {
        &self.accounts
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Pass, cooldown, repeat
    pub async fn run_forever(&self) -> anyhow::Result<()> {
        loop {
            let summary = self.run_pass().await;
            info!(
                "Pass finished | Completed: {} | Failed: {} | Timed out: {}",
                summary.completed, summary.failed, summary.timed_out
            );
            cooldown(self.config.cooldown()).await;
        }
    }

    /// One pass over every account, `worker_limit` at a time
    pub async fn run_pass(&self) -> PassSummary {
        let mut summary = PassSummary::default();
        let limit = self.config.worker_limit();
        let batches = self.accounts.chunks(limit).count();

        for (number, batch) in self.accounts.chunks(limit).enumerate() {
            let mut tasks = JoinSet::new();
            for account in batch {
                tasks.spawn(self.account_task(account.clone()));
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(AccountOutcome::Completed) => summary.completed += 1,
                    Ok(AccountOutcome::Failed) => summary.failed += 1,
                    Ok(AccountOutcome::TimedOut) => summary.timed_out += 1,
                    Err(e) => {
                        error!("Worker task crashed: {}", e);
                        summary.failed += 1;
                    }
                }
            }

            if number + 1 < batches {
                tokio::time::sleep(self.config.pacing.batch_pause()).await;
            }
        }
        summary
    }

    fn account_task(
        &self,
        account: AccountSession,
    ) -> impl std::future::Future<Output = AccountOutcome> + Send + 'static {
        let deps = Worker {
            config: Arc::clone(&self.config),
            catalogs: Arc::clone(&self.catalogs),
            settings: Arc::clone(&self.settings),
            agents: Arc::clone(&self.agents),
        };
        let span = info_span!(
            "account",
            index = account.index + 1,
            name = %account.display_name(),
            ip = tracing::field::Empty,
        );
        let limit = self.config.account_timeout();

        async move {
            match tokio::time::timeout(limit, deps.run(account)).await {
                Ok(Ok(report)) => {
                    info!(
                        "Cycle done | Drawn: {} | Mixed: {} | Missions: {}/{} | Quests: {} | PVP: {}W/{}L",
                        report.pets_drawn,
                        report.pairs_mixed,
                        report.missions_claimed,
                        report.missions_entered,
                        report.quests_done,
                        report.battles_won,
                        report.battles_lost
                    );
                    AccountOutcome::Completed
                }
                Ok(Err(e)) => {
                    error!("Account run failed: {}", e);
                    AccountOutcome::Failed
                }
                Err(_) => {
                    error!("Account run timed out after {:?}", limit);
                    AccountOutcome::TimedOut
                }
            }
        }
        .instrument(span)
    }
}

enum AccountOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Owned handles one account task needs
struct Worker {
    config: Arc<FarmConfig>,
    catalogs: Arc<Catalogs>,
    settings: Arc<CycleSettings>,
    agents: Arc<FileUserAgentStore>,
}

impl Worker {
    async fn run(self, account: AccountSession) -> Result<CycleReport, FarmError> {
        info!("Starting {}", account.label());

        if let Some(proxy) = &account.proxy {
            let ip = check_proxy_ip(proxy, self.config.request_timeout()).await?;
            Span::current().record("ip", ip.as_str());
            let delay = jitter(self.config.pacing.start_delay_secs);
            info!("Starting in {} seconds...", delay.as_secs());
            tokio::time::sleep(delay).await;
        }

        let user_agent = self.agents.user_agent_for(&account.session_key()).await?;
        let client = ApiClient::new(ClientOptions {
            base_url: self.config.base_url.clone(),
            init_data: account.init_data.clone(),
            user_agent,
            proxy: account.proxy.clone(),
            timeout: self.config.request_timeout(),
            retries: self.config.retries,
            pacing: self.config.pacing.clone(),
        })?;

        let cycle = AccountCycle::new(
            HttpGameGateway::new(client),
            self.catalogs,
            self.settings,
            Pacer::new(self.config.pacing.clone()),
            RandomPicker::new(),
        );
        Ok(cycle.run().await?)
    }
}

/// Refuse to start without accounts, or with too few proxies
pub fn check_accounts(accounts: usize, proxies: usize, use_proxy: bool) -> Result<(), FarmError> {
    if accounts == 0 {
        return Err(FarmError::Config("no accounts found in the data file".into()));
    }
    if use_proxy && accounts > proxies {
        return Err(FarmError::Config(format!(
            "the number of proxies and data must be equal (data: {}, proxy: {})",
            accounts, proxies
        )));
    }
    Ok(())
}

async fn cooldown(duration: Duration) {
    let secs = duration.as_secs();
    if secs == 0 {
        return;
    }
    info!("Cooldown for {} minutes", secs / 60);

    let bar = ProgressBar::new(secs);
    if let Ok(style) = ProgressStyle::with_template("{spinner} Next pass in {msg} [{bar:40}]") {
        bar.set_style(style.progress_chars("=> "));
    }
    for remaining in (1..=secs).rev() {
        bar.set_message(format!("{}m {:02}s", remaining / 60, remaining % 60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        bar.inc(1);
    }
    bar.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "query_id=AAE&user=%7B%22id%22%3A7%2C%22first_name%22%3A%22Bo%22%7D&hash=x";

    fn workspace(proxies: &str) -> (tempfile::TempDir, FarmConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("data.txt"), format!("{}\n{}\n", LINE, LINE)).unwrap();
        std::fs::write(root.join("proxy.txt"), proxies).unwrap();
        std::fs::write(root.join("missions.json"), "[]").unwrap();
        std::fs::write(
            root.join("pets.json"),
            r#"[{"pet_id": 1, "star": 1, "class": "Earth"}]"#,
        )
        .unwrap();

        let config = FarmConfig {
            data_file: root.join("data.txt"),
            proxy_file: root.join("proxy.txt"),
            user_agent_cache: root.join("session_user_agents.json"),
            missions_catalog: root.join("missions.json"),
            pets_catalog: root.join("pets.json"),
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn test_check_accounts() {
        assert!(check_accounts(0, 0, false).is_err());
        assert!(check_accounts(3, 2, true).is_err());
        assert!(check_accounts(3, 0, false).is_ok());
        assert!(check_accounts(2, 2, true).is_ok());
    }

    #[test]
    fn test_prepare_without_proxy_ignores_proxy_file() {
        let (_dir, config) = workspace("http://p1:80\n");

        let runner = Runner::prepare(config).unwrap();
        assert_eq!(runner.accounts().len(), 2);
        assert!(runner.accounts().iter().all(|a| a.proxy.is_none()));
        assert_eq!(runner.catalogs().pets.len(), 1);
    }

    #[test]
    fn test_prepare_rejects_too_few_proxies() {
        let (_dir, mut config) = workspace("http://p1:80\n");
        config.use_proxy = true;

        assert!(Runner::prepare(config).is_err());
    }

    #[test]
    fn test_prepare_assigns_proxies() {
        let (_dir, mut config) = workspace("http://p1:80\nhttp://p2:80\n");
        config.use_proxy = true;

        let runner = Runner::prepare(config).unwrap();
        let proxies: Vec<_> = runner
            .accounts()
            .iter()
            .map(|a| a.proxy.as_deref().unwrap())
            .collect();
        assert_eq!(proxies, vec!["http://p1:80", "http://p2:80"]);
    }
}
