//! Ports - What the cycle needs from the outside world
//!
//! These are PORTS in hexagonal architecture. `farm-adapter` provides the
//! HTTP and file-backed implementations; tests provide in-memory fakes.

use async_trait::async_trait;
use shared::ApiError;

use crate::dto::{
    Ack, AchievementBoard, AttackOutcome, AttackRequest, BattleInfo, DefenseTeamRequest,
    DnaEntry, EnterMissionRequest, GachaBonus, GachaDraw, GachaRequest, MissionEntry, MixOutcome,
    MixRequest, OpponentBoard, PetEntry, QuestBoard, QuestCheck, SeasonPassEntry, UserInfo,
};

/// Result of one game API call
pub type ApiResult<T> = Result<T, ApiError>;

/// Which gacha currency a draw or bonus track refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GachaKind {
    Common,
    Super,
}

impl GachaKind {
    pub fn is_super(self) -> bool {
        matches!(self, GachaKind::Super)
    }

    pub fn label(self) -> &'static str {
        match self {
            GachaKind::Common => "Common",
            GachaKind::Super => "Super",
        }
    }
}

/// Game API, one method per endpoint the cycle uses
///
/// Every call is authenticated with the account's init data. Transport
/// details (headers, retries, envelopes) never leak through this trait.
#[async_trait]
pub trait GameGateway: Send + Sync {
    // Account state
    async fn user_info(&self) -> ApiResult<UserInfo>;
    async fn pets(&self) -> ApiResult<Vec<PetEntry>>;
    async fn dna(&self) -> ApiResult<Vec<DnaEntry>>;
    async fn missions(&self) -> ApiResult<Vec<MissionEntry>>;
    async fn achievements(&self) -> ApiResult<AchievementBoard>;
    async fn quests(&self) -> ApiResult<QuestBoard>;
    async fn season_passes(&self) -> ApiResult<Vec<SeasonPassEntry>>;

    // Gacha
    async fn draw_gacha(&self, request: GachaRequest) -> ApiResult<GachaDraw>;
    async fn gacha_bonus(&self, kind: GachaKind) -> ApiResult<GachaBonus>;
    async fn claim_gacha_bonus(&self, reward_no: u8) -> ApiResult<Ack>;

    // Missions and breeding
    async fn claim_mission(&self, mission_id: u64) -> ApiResult<Ack>;
    async fn enter_mission(&self, request: EnterMissionRequest) -> ApiResult<Ack>;
    async fn mix_pets(&self, request: MixRequest) -> ApiResult<MixOutcome>;

    // Rewards
    async fn claim_season_pass(&self, season_id: u64, step: u32) -> ApiResult<Ack>;
    async fn check_quest(&self, quest_code: &str) -> ApiResult<QuestCheck>;
    async fn claim_achievement(&self, quest_id: u64) -> ApiResult<Ack>;
    async fn join_clan(&self, clan_id: u64) -> ApiResult<Ack>;
    async fn quit_clan(&self, clan_id: u64) -> ApiResult<Ack>;

    // PVP
    async fn battle_info(&self) -> ApiResult<BattleInfo>;
    async fn set_defense_team(&self, request: DefenseTeamRequest) -> ApiResult<Ack>;
    async fn opponents(&self) -> ApiResult<OpponentBoard>;
    async fn attack(&self, request: AttackRequest) -> ApiResult<AttackOutcome>;
    async fn claim_pvp_reward(&self, season_id: u64) -> ApiResult<Ack>;
}

/// Per-session user agent cache
///
/// The only state shared between concurrent account workers. A session
/// keeps the same user agent across runs once one has been assigned.
#[async_trait]
pub trait UserAgentStore: Send + Sync {
    async fn user_agent_for(&self, session_key: &str) -> shared::Result<String>;
}
