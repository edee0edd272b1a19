//! In-memory game backend for cycle tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use farm_domain::UnitPicker;
use serde_json::json;
use shared::ApiError;

use super::{AccountCycle, Catalogs, CycleSettings};
use crate::dto::*;
use crate::pacer::Pacer;
use crate::port::{ApiResult, GachaKind, GameGateway};

#[derive(Default)]
struct State {
    user: UserInfo,
    /// [common, super]
    balances: [u64; 2],
    pets: Vec<PetEntry>,
    dna: Vec<DnaEntry>,
    missions: Vec<MissionEntry>,
    rejected_missions: HashSet<u64>,
    achievements: AchievementBoard,
    quests: QuestBoard,
    season_passes: Vec<SeasonPassEntry>,
    bonus: GachaBonus,
    battle: BattleInfo,
    opponent: OpponentBoard,
    failures: HashMap<String, ApiError>,
    calls: Vec<(String, String)>,
}

/// Shared handle; clones see the same state
#[derive(Clone, Default)]
pub struct FakeGame {
    state: Arc<Mutex<State>>,
}

impl FakeGame {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, name: &str, detail: impl Into<String>) -> ApiResult<()> {
        let mut state = self.lock();
        state.calls.push((name.to_string(), detail.into()));
        match state.failures.get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    pub fn fail(&self, name: &str, error: ApiError) {
        self.lock().failures.insert(name.to_string(), error);
    }

    pub fn set_user(&self, user: UserInfo) {
        let mut state = self.lock();
        state.balances = [user.god_power, user.super_power()];
        state.user = user;
    }

    pub fn set_pets(&self, pets: Vec<PetEntry>) {
        self.lock().pets = pets;
    }

    pub fn set_dna(&self, dna: Vec<DnaEntry>) {
        self.lock().dna = dna;
    }

    pub fn set_missions(&self, missions: Vec<MissionEntry>) {
        self.lock().missions = missions;
    }

    pub fn reject_mission(&self, mission_id: u64) {
        self.lock().rejected_missions.insert(mission_id);
    }

    pub fn set_achievements(&self, board: AchievementBoard) {
        self.lock().achievements = board;
    }

    pub fn set_quests(&self, quests: QuestBoard) {
        self.lock().quests = quests;
    }

    pub fn set_season_passes(&self, passes: Vec<SeasonPassEntry>) {
        self.lock().season_passes = passes;
    }

    pub fn set_bonus(&self, bonus: GachaBonus) {
        self.lock().bonus = bonus;
    }

    pub fn set_battle(&self, battle: BattleInfo) {
        self.lock().battle = battle;
    }

    pub fn set_opponent(&self, opponent: OpponentBoard) {
        self.lock().opponent = opponent;
    }

    /// Endpoint names in call order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Recorded arguments of every call to `name`
    pub fn calls_to(&self, name: &str) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, detail)| detail.clone())
            .collect()
    }
}

fn ack() -> Ack {
    json!({})
}

#[async_trait]
impl GameGateway for FakeGame {
    async fn user_info(&self) -> ApiResult<UserInfo> {
        self.record("user_info", "")?;
        Ok(self.lock().user.clone())
    }

    async fn pets(&self) -> ApiResult<Vec<PetEntry>> {
        self.record("pets", "")?;
        Ok(self.lock().pets.clone())
    }

    async fn dna(&self) -> ApiResult<Vec<DnaEntry>> {
        self.record("dna", "")?;
        Ok(self.lock().dna.clone())
    }

    async fn missions(&self) -> ApiResult<Vec<MissionEntry>> {
        self.record("missions", "")?;
        Ok(self.lock().missions.clone())
    }

    async fn achievements(&self) -> ApiResult<AchievementBoard> {
        self.record("achievements", "")?;
        Ok(self.lock().achievements.clone())
    }

    async fn quests(&self) -> ApiResult<QuestBoard> {
        self.record("quests", "")?;
        Ok(self.lock().quests.clone())
    }

    async fn season_passes(&self) -> ApiResult<Vec<SeasonPassEntry>> {
        self.record("season_passes", "")?;
        Ok(self.lock().season_passes.clone())
    }

    async fn draw_gacha(&self, request: GachaRequest) -> ApiResult<GachaDraw> {
        self.record("draw_gacha", format!("{}:{}", request.amount, request.is_super))?;
        let mut state = self.lock();
        let slot = usize::from(request.is_super);
        state.balances[slot] = state.balances[slot].saturating_sub(u64::from(request.amount));
        Ok(GachaDraw {
            dna: (0..request.amount)
                .map(|i| PetSummary {
                    name: format!("pet-{}", i),
                    class: "Earth".into(),
                    star: 1,
                })
                .collect(),
            god_power: state.balances[0],
            inventory: vec![InventoryItem {
                id: SUPER_POWER_ITEM,
                amount: state.balances[1],
            }],
        })
    }

    async fn gacha_bonus(&self, kind: GachaKind) -> ApiResult<GachaBonus> {
        self.record("gacha_bonus", kind.label())?;
        Ok(self.lock().bonus.clone())
    }

    async fn claim_gacha_bonus(&self, reward_no: u8) -> ApiResult<Ack> {
        self.record("claim_gacha_bonus", reward_no.to_string())?;
        Ok(ack())
    }

    async fn claim_mission(&self, mission_id: u64) -> ApiResult<Ack> {
        self.record("claim_mission", mission_id.to_string())?;
        self.lock().missions.retain(|m| m.mission_id != mission_id);
        Ok(ack())
    }

    async fn enter_mission(&self, request: EnterMissionRequest) -> ApiResult<Ack> {
        self.record(
            "enter_mission",
            format!(
                "{}:{},{},{}",
                request.mission_id, request.pet_1_id, request.pet_2_id, request.pet_3_id
            ),
        )?;
        let mut state = self.lock();
        if state.rejected_missions.contains(&request.mission_id) {
            return Err(ApiError::BadRequest {
                path: "/public/mission/enter".into(),
                detail: "mission unavailable".into(),
            });
        }
        state.missions.push(MissionEntry {
            mission_id: request.mission_id,
            name: String::new(),
            end_time: i64::MAX,
            pet_joined: Some(
                [request.pet_1_id, request.pet_2_id, request.pet_3_id]
                    .into_iter()
                    .map(|pet_id| PetRef { pet_id })
                    .collect(),
            ),
        });
        Ok(ack())
    }

    async fn mix_pets(&self, request: MixRequest) -> ApiResult<MixOutcome> {
        self.record("mix_pets", format!("{}+{}", request.dad_id, request.mom_id))?;
        Ok(MixOutcome {
            pet: Some(PetSummary {
                name: "Baby".into(),
                class: "Wind".into(),
                star: 2,
            }),
        })
    }

    async fn claim_season_pass(&self, season_id: u64, step: u32) -> ApiResult<Ack> {
        self.record("claim_season_pass", format!("{}:{}", season_id, step))?;
        Ok(ack())
    }

    async fn check_quest(&self, quest_code: &str) -> ApiResult<QuestCheck> {
        self.record("check_quest", quest_code)?;
        Ok(QuestCheck { status: true })
    }

    async fn claim_achievement(&self, quest_id: u64) -> ApiResult<Ack> {
        self.record("claim_achievement", quest_id.to_string())?;
        Ok(ack())
    }

    async fn join_clan(&self, clan_id: u64) -> ApiResult<Ack> {
        self.record("join_clan", clan_id.to_string())?;
        Ok(ack())
    }

    async fn quit_clan(&self, clan_id: u64) -> ApiResult<Ack> {
        self.record("quit_clan", clan_id.to_string())?;
        Ok(ack())
    }

    async fn battle_info(&self) -> ApiResult<BattleInfo> {
        self.record("battle_info", "")?;
        Ok(self.lock().battle.clone())
    }

    async fn set_defense_team(&self, request: DefenseTeamRequest) -> ApiResult<Ack> {
        self.record(
            "set_defense_team",
            format!("{},{},{}", request.pet_id_1, request.pet_id_2, request.pet_id_3),
        )?;
        Ok(ack())
    }

    async fn opponents(&self) -> ApiResult<OpponentBoard> {
        self.record("opponents", "")?;
        Ok(self.lock().opponent.clone())
    }

    async fn attack(&self, request: AttackRequest) -> ApiResult<AttackOutcome> {
        self.record(
            "attack",
            format!(
                "{}:{},{},{}",
                request.opponent_id, request.pet_id_1, request.pet_id_2, request.pet_id_3
            ),
        )?;
        let mut state = self.lock();
        let remaining = state.battle.ticket.amount.saturating_sub(1);
        state.battle.ticket.amount = remaining;
        Ok(AttackOutcome {
            is_win: true,
            rounds: vec![Round { result: true }, Round { result: true }],
            score: 10,
            ticket: Ticket { amount: remaining },
        })
    }

    async fn claim_pvp_reward(&self, season_id: u64) -> ApiResult<Ack> {
        self.record("claim_pvp_reward", season_id.to_string())?;
        Ok(ack())
    }
}

/// Always takes the first free unit
pub struct FirstPicker;

impl UnitPicker for FirstPicker {
    fn pick(&mut self, _upper: usize) -> usize {
        0
    }
}

/// A cycle over `game` with zero pacing
pub fn cycle(
    game: &FakeGame,
    settings: CycleSettings,
    catalogs: Catalogs,
) -> AccountCycle<FakeGame, FirstPicker> {
    AccountCycle::new(
        game.clone(),
        Arc::new(catalogs),
        Arc::new(settings),
        Pacer::immediate(),
        FirstPicker,
    )
}
