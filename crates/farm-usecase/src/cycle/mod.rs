//! Account Cycle - One full farming pass for one account
//!
//! Steps run strictly in order and each is best effort:
//!
//! ```text
//! sync ─▶ gacha ─▶ [bonus] ─▶ [breeding] ─▶ missions ─▶ rewards ─▶ [pvp]
//! ```
//!
//! A failed fetch means "no data": the dependent step is skipped and the
//! cycle moves on. Only an unauthorized session ends the run early.

mod breeding;
mod gacha;
mod missions;
mod pvp;
mod rewards;

#[cfg(test)]
mod fake;

use std::sync::Arc;

use farm_domain::{MissionCatalog, PetCatalog, UnitPicker};
use shared::{ApiError, FarmConfig};
use tracing::{info, warn};

use crate::dto::UserInfo;
use crate::pacer::Pacer;
use crate::port::{ApiResult, GameGateway};

/// Static catalogs, loaded once and shared by every account
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub missions: MissionCatalog,
    pub pets: PetCatalog,
}

/// Feature switches and lists the cycle reads from configuration
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub max_amount_gacha: u32,
    pub auto_claim_bonus: bool,
    pub auto_merge_pet: bool,
    pub enable_advanced_merge: bool,
    pub auto_pvp: bool,
    pub skip_pets_dna: Vec<String>,
    pub skip_tasks: Vec<String>,
    pub skip_missions: Vec<u64>,
    pub clan_id: Option<u64>,
}

impl From<&FarmConfig> for CycleSettings {
    fn from(config: &FarmConfig) -> Self {
        Self {
            max_amount_gacha: config.max_amount_gacha,
            auto_claim_bonus: config.auto_claim_bonus,
            auto_merge_pet: config.auto_merge_pet,
            enable_advanced_merge: config.enable_advanced_merge,
            auto_pvp: config.auto_pvp,
            skip_pets_dna: config.skip_pets_dna.clone(),
            skip_tasks: config.skip_tasks.clone(),
            skip_missions: config.skip_missions.clone(),
            clan_id: config.clan_id,
        }
    }
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self::from(&FarmConfig::default())
    }
}

/// What one cycle achieved, for the end-of-run log line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub synced: bool,
    pub pets_drawn: u32,
    pub bonuses_claimed: u32,
    pub pairs_mixed: u32,
    pub missions_claimed: u32,
    pub missions_entered: u32,
    pub quests_done: u32,
    pub achievements_claimed: u32,
    pub season_rewards_claimed: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
}

/// Per-account run context
///
/// Owns everything one worker needs; nothing here is shared with other
/// accounts except the read-only catalogs and settings.
pub struct AccountCycle<G, P> {
    gateway: G,
    catalogs: Arc<Catalogs>,
    settings: Arc<CycleSettings>,
    pacer: Pacer,
    picker: P,
    report: CycleReport,
}

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    pub fn new(
        gateway: G,
        catalogs: Arc<Catalogs>,
        settings: Arc<CycleSettings>,
        pacer: Pacer,
        picker: P,
    ) -> Self {
        Self {
            gateway,
            catalogs,
            settings,
            pacer,
            picker,
            report: CycleReport::default(),
        }
    }

    /// Run every step once
    ///
    /// Returns `Err` only for a fatal API error; everything else is
    /// logged and reflected in the report.
    pub async fn run(mut self) -> Result<CycleReport, ApiError> {
        let Some(user) = self.sync().await? else {
            return Ok(self.report);
        };

        self.pacer.step().await;
        self.draw_gacha(&user).await?;

        if self.settings.auto_claim_bonus {
            self.pacer.step().await;
            self.claim_gacha_bonuses().await?;
        }

        if self.settings.auto_merge_pet {
            self.pacer.step().await;
            self.breed().await?;
        }

        self.pacer.step().await;
        self.handle_missions().await?;

        self.pacer.step().await;
        self.collect_rewards(user.clan_id).await?;

        if self.settings.auto_pvp {
            self.pacer.step().await;
            self.run_pvp().await?;
        }

        Ok(self.report)
    }

    async fn sync(&mut self) -> Result<Option<UserInfo>, ApiError> {
        info!("Sync data...");
        let Some(user) = tolerate("user info", self.gateway.user_info().await)? else {
            warn!("Can't sync new data, skipping this cycle");
            return Ok(None);
        };

        info!(
            "User: {} | Balance: {} | Gacha: {} | Super Gacha: {} | Level: {}",
            user.full_name,
            user.token,
            user.god_power,
            user.super_power(),
            user.level
        );
        self.report.synced = true;
        Ok(Some(user))
    }
}

/// Turn a non-fatal API error into "no data"
///
/// Fatal errors are passed through so `?` ends the run.
fn tolerate<T>(action: &str, result: ApiResult<T>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_fatal() => Err(error),
        Err(error) => {
            warn!(action, %error, "request failed, skipping");
            Ok(None)
        }
    }
}
