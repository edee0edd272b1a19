//! `GameGateway` over HTTP
//!
//! Maps each port method to its `/public/...` endpoint and payload shape.

use async_trait::async_trait;
use farm_usecase::dto::{
    Ack, AchievementBoard, AttackOutcome, AttackRequest, BattleInfo, DefenseTeamRequest,
    DnaEntry, EnterMissionRequest, GachaBonus, GachaDraw, GachaRequest, MissionEntry, MixOutcome,
    MixRequest, OpponentBoard, PetEntry, QuestBoard, QuestCheck, SeasonPassEntry, UserInfo,
};
use farm_usecase::{ApiResult, GachaKind, GameGateway};
use serde_json::json;

use super::http_client::ApiClient;

/// Game API adapter for one account
#[derive(Debug, Clone)]
pub struct HttpGameGateway {
    client: ApiClient,
}

impl HttpGameGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GameGateway for HttpGameGateway {
    async fn user_info(&self) -> ApiResult<UserInfo> {
        self.client.get("/public/user/info").await
    }

    async fn pets(&self) -> ApiResult<Vec<PetEntry>> {
        self.client.get("/public/pet/list").await
    }

    async fn dna(&self) -> ApiResult<Vec<DnaEntry>> {
        self.client.get("/public/pet/dna/list").await
    }

    async fn missions(&self) -> ApiResult<Vec<MissionEntry>> {
        self.client.get("/public/mission/list").await
    }

    async fn achievements(&self) -> ApiResult<AchievementBoard> {
        self.client.get("/public/achievement/list").await
    }

    async fn quests(&self) -> ApiResult<QuestBoard> {
        self.client.get("/public/quest/list").await
    }

    async fn season_passes(&self) -> ApiResult<Vec<SeasonPassEntry>> {
        self.client.get("/public/season-pass/list").await
    }

    async fn draw_gacha(&self, request: GachaRequest) -> ApiResult<GachaDraw> {
        self.client.post("/public/pet/dna/gacha", &request).await
    }

    async fn gacha_bonus(&self, kind: GachaKind) -> ApiResult<GachaBonus> {
        let path = format!("/public/pet/dna/gacha/bonus?is_super={}", kind.is_super());
        self.client.get(&path).await
    }

    async fn claim_gacha_bonus(&self, reward_no: u8) -> ApiResult<Ack> {
        self.client
            .post("/public/pet/dna/gacha/bonus/claim", &json!({ "reward_no": reward_no }))
            .await
    }

    async fn claim_mission(&self, mission_id: u64) -> ApiResult<Ack> {
        self.client
            .post("/public/mission/claim", &json!({ "mission_id": mission_id }))
            .await
    }

    async fn enter_mission(&self, request: EnterMissionRequest) -> ApiResult<Ack> {
        self.client.post("/public/mission/enter", &request).await
    }

    async fn mix_pets(&self, request: MixRequest) -> ApiResult<MixOutcome> {
        self.client.post("/public/pet/mix", &request).await
    }

    async fn claim_season_pass(&self, season_id: u64, step: u32) -> ApiResult<Ack> {
        let payload = json!({ "season_id": season_id, "type": "free", "step": step });
        self.client.post("/public/season-pass/claim", &payload).await
    }

    async fn check_quest(&self, quest_code: &str) -> ApiResult<QuestCheck> {
        self.client
            .post("/public/quest/check", &json!({ "quest_code": quest_code }))
            .await
    }

    async fn claim_achievement(&self, quest_id: u64) -> ApiResult<Ack> {
        self.client
            .post("/public/achievement/claim", &json!({ "quest_id": quest_id }))
            .await
    }

    async fn join_clan(&self, clan_id: u64) -> ApiResult<Ack> {
        self.client
            .post("/public/clan/join", &json!({ "clan_id": clan_id }))
            .await
    }

    async fn quit_clan(&self, clan_id: u64) -> ApiResult<Ack> {
        self.client
            .post("/public/clan/quit", &json!({ "clan_id": clan_id }))
            .await
    }

    async fn battle_info(&self) -> ApiResult<BattleInfo> {
        self.client.get("/public/battle/user/info").await
    }

    async fn set_defense_team(&self, request: DefenseTeamRequest) -> ApiResult<Ack> {
        self.client
            .post("/public/battle/user/defense-team", &request)
            .await
    }

    async fn opponents(&self) -> ApiResult<OpponentBoard> {
        self.client.get("/public/battle/user/opponents").await
    }

    async fn attack(&self, request: AttackRequest) -> ApiResult<AttackOutcome> {
        self.client.post("/public/battle/attack", &request).await
    }

    async fn claim_pvp_reward(&self, season_id: u64) -> ApiResult<Ack> {
        self.client
            .post("/public/battle/user/reward/claim", &json!({ "season_id": season_id }))
            .await
    }
}
