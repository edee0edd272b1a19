//! Wire shapes of the game API and their conversion into domain types
//!
//! Response DTOs are lenient: every field has a default and counters the
//! backend sometimes sends as strings are accepted either way. Payloads
//! serialize to exactly the field names the backend expects.

use std::collections::BTreeMap;

use farm_domain::{
    Achievement, ActiveMission, BattleTeam, DnaStack, GachaBonusProgress, MissionAssignment,
    MissionId, PetClass, PetId, PetStack, PetUnit, Quest, SeasonPass, SeasonReward,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Acknowledgement body of a submit call; only its presence matters
pub type Ack = serde_json::Value;

/// Inventory id of the super gacha currency
pub const SUPER_POWER_ITEM: u64 = 3;

fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
        Raw::Null(()) => Ok(0),
    }
}

fn flexible_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = flexible_u64(deserializer)?;
    u32::try_from(value).map_err(de::Error::custom)
}

// =============================================================================
// Account
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    #[serde(deserialize_with = "flexible_u64")]
    pub id: u64,
    #[serde(deserialize_with = "flexible_u64")]
    pub amount: u64,
}

fn super_power_of(inventory: &[InventoryItem]) -> u64 {
    inventory
        .iter()
        .find(|item| item.id == SUPER_POWER_ITEM)
        .map(|item| item.amount)
        .unwrap_or(0)
}

/// `/public/user/info`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub full_name: String,
    /// Soft currency balance, display only
    pub token: serde_json::Value,
    #[serde(deserialize_with = "flexible_u64")]
    pub god_power: u64,
    pub clan_id: Option<u64>,
    pub level: u32,
    pub inventory: Vec<InventoryItem>,
}

impl UserInfo {
    pub fn super_power(&self) -> u64 {
        super_power_of(&self.inventory)
    }

    /// Balance of the given gacha currency
    pub fn balance(&self, is_super: bool) -> u64 {
        if is_super {
            self.super_power()
        } else {
            self.god_power
        }
    }
}

// =============================================================================
// Pets and DNA
// =============================================================================

/// One entry of `/public/pet/list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PetEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub pet_id: u64,
    pub name: String,
    pub star: u8,
    pub class: String,
    pub level: u32,
    #[serde(deserialize_with = "flexible_u32")]
    pub amount: u32,
}

impl PetEntry {
    pub fn to_stack(&self) -> PetStack {
        PetStack {
            pet_id: PetId::new(self.pet_id),
            star: self.star,
            class: PetClass::parse(&self.class),
            level: self.level,
            amount: self.amount,
        }
    }

    pub fn to_unit(&self) -> PetUnit {
        PetUnit::new(self.pet_id, self.star, PetClass::parse(&self.class), self.level)
    }
}

/// One entry of `/public/pet/dna/list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DnaEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub item_id: u64,
    pub name: String,
    #[serde(deserialize_with = "flexible_u32")]
    pub amount: u32,
    pub can_mom: bool,
}

impl From<&DnaEntry> for DnaStack {
    fn from(entry: &DnaEntry) -> Self {
        DnaStack {
            item_id: entry.item_id,
            name: entry.name.clone(),
            amount: entry.amount,
            can_mom: entry.can_mom,
        }
    }
}

/// Pet summary returned by draws and mixes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PetSummary {
    pub name: String,
    pub class: String,
    pub star: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct MixRequest {
    pub dad_id: u64,
    pub mom_id: u64,
}

/// `/public/pet/mix`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MixOutcome {
    pub pet: Option<PetSummary>,
}

// =============================================================================
// Gacha
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GachaRequest {
    pub amount: u32,
    pub is_super: bool,
}

/// `/public/pet/dna/gacha`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GachaDraw {
    pub dna: Vec<PetSummary>,
    #[serde(deserialize_with = "flexible_u64")]
    pub god_power: u64,
    pub inventory: Vec<InventoryItem>,
}

impl GachaDraw {
    /// Remaining balance of the currency the draw was paid with
    pub fn balance(&self, is_super: bool) -> u64 {
        if is_super {
            super_power_of(&self.inventory)
        } else {
            self.god_power
        }
    }
}

/// `/public/pet/dna/gacha/bonus`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GachaBonus {
    pub current_step: u32,
    pub step_bonus_god_power: u32,
    pub step_bonus_dna: u32,
    pub is_claimed_god_power: bool,
    pub is_claimed_dna: bool,
}

impl From<&GachaBonus> for GachaBonusProgress {
    fn from(bonus: &GachaBonus) -> Self {
        GachaBonusProgress {
            current_step: bonus.current_step,
            step_bonus_god_power: bonus.step_bonus_god_power,
            step_bonus_dna: bonus.step_bonus_dna,
            claimed_god_power: bonus.is_claimed_god_power,
            claimed_dna: bonus.is_claimed_dna,
        }
    }
}

// =============================================================================
// Missions
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PetRef {
    #[serde(deserialize_with = "flexible_u64")]
    pub pet_id: u64,
}

/// One entry of `/public/mission/list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MissionEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub mission_id: u64,
    pub name: String,
    pub end_time: i64,
    pub pet_joined: Option<Vec<PetRef>>,
}

impl From<&MissionEntry> for ActiveMission {
    fn from(entry: &MissionEntry) -> Self {
        ActiveMission {
            id: MissionId::new(entry.mission_id),
            name: entry.name.clone(),
            end_time: entry.end_time,
            committed: entry
                .pet_joined
                .iter()
                .flatten()
                .map(|p| PetId::new(p.pet_id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnterMissionRequest {
    pub mission_id: u64,
    pub pet_1_id: u64,
    pub pet_2_id: u64,
    pub pet_3_id: u64,
}

impl From<&MissionAssignment> for EnterMissionRequest {
    fn from(assignment: &MissionAssignment) -> Self {
        let [a, b, c] = assignment.pet_ids;
        Self {
            mission_id: assignment.mission_id.get(),
            pet_1_id: a.get(),
            pet_2_id: b.get(),
            pet_3_id: c.get(),
        }
    }
}

// =============================================================================
// Quests, achievements, season pass
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestEntry {
    pub quest_code: String,
    pub status: bool,
}

/// `/public/quest/list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestBoard {
    pub quests: Vec<QuestEntry>,
}

impl QuestBoard {
    pub fn to_quests(&self) -> Vec<Quest> {
        self.quests
            .iter()
            .map(|q| Quest {
                code: q.quest_code.clone(),
                done: q.status,
            })
            .collect()
    }
}

/// `/public/quest/check`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestCheck {
    pub status: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AchievementEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub quest_id: u64,
    pub status: bool,
    pub claimed: bool,
    pub pet: Option<PetRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AchievementGroup {
    pub achievements: Vec<AchievementEntry>,
}

/// `/public/achievement/list`: achievements grouped by category
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AchievementBoard(pub BTreeMap<String, AchievementGroup>);

impl AchievementBoard {
    pub fn to_achievements(&self) -> Vec<Achievement> {
        self.0
            .iter()
            .flat_map(|(category, group)| {
                group.achievements.iter().map(move |a| Achievement {
                    quest_id: a.quest_id,
                    category: category.clone(),
                    completed: a.status,
                    claimed: a.claimed,
                    collection_code: a.pet.as_ref().map(|p| p.pet_id),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonRewardEntry {
    pub step: u32,
    pub is_claimed: bool,
    #[serde(deserialize_with = "flexible_u64")]
    pub amount: u64,
    pub name: String,
}

/// One entry of `/public/season-pass/list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonPassEntry {
    pub season_id: u64,
    pub current_step: u32,
    pub title: String,
    pub free_rewards: Vec<SeasonRewardEntry>,
}

impl From<&SeasonPassEntry> for SeasonPass {
    fn from(entry: &SeasonPassEntry) -> Self {
        SeasonPass {
            season_id: entry.season_id,
            current_step: entry.current_step,
            title: entry.title.clone(),
            free_rewards: entry
                .free_rewards
                .iter()
                .map(|r| SeasonReward {
                    step: r.step,
                    claimed: r.is_claimed,
                    amount: r.amount,
                    name: r.name.clone(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// PVP
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ticket {
    pub amount: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonRef {
    pub season_id: Option<u64>,
}

/// `/public/battle/user/info`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BattleInfo {
    pub is_end_season: bool,
    pub defense_team: Vec<PetRef>,
    pub score: i64,
    pub win_match: u32,
    pub is_claimed: bool,
    pub not_claimed_rewards_info: Option<SeasonRef>,
    pub tier_name: String,
    pub ticket: Ticket,
}

impl BattleInfo {
    /// Season whose PVP reward is still waiting to be claimed
    pub fn unclaimed_season(&self) -> Option<u64> {
        if self.is_claimed {
            return None;
        }
        self.not_claimed_rewards_info
            .as_ref()
            .and_then(|info| info.season_id)
    }

    pub fn defense_ids(&self) -> Vec<PetId> {
        self.defense_team.iter().map(|p| PetId::new(p.pet_id)).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpponentPetEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub pet_id: u64,
    pub level: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpponentEntry {
    #[serde(deserialize_with = "flexible_u64")]
    pub telegram_id: u64,
    pub pets: Vec<OpponentPetEntry>,
}

/// `/public/battle/user/opponents`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpponentBoard {
    pub opponent: OpponentEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefenseTeamRequest {
    pub pet_id_1: u64,
    pub pet_id_2: u64,
    pub pet_id_3: u64,
}

impl From<[PetId; 3]> for DefenseTeamRequest {
    fn from([a, b, c]: [PetId; 3]) -> Self {
        Self {
            pet_id_1: a.get(),
            pet_id_2: b.get(),
            pet_id_3: c.get(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackRequest {
    pub opponent_id: u64,
    pub pet_id_1: u64,
    pub pet_id_2: u64,
    pub pet_id_3: u64,
}

impl AttackRequest {
    pub fn new(opponent_id: u64, team: &BattleTeam) -> Self {
        let [a, b, c] = team.pet_ids();
        Self {
            opponent_id,
            pet_id_1: a.get(),
            pet_id_2: b.get(),
            pet_id_3: c.get(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Round {
    pub result: bool,
}

/// `/public/battle/attack`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttackOutcome {
    pub is_win: bool,
    pub rounds: Vec<Round>,
    pub score: i64,
    pub ticket: Ticket,
}

impl AttackOutcome {
    /// "Round 1: Win, Round 2: Lose, ..."
    pub fn round_summary(&self) -> String {
        self.rounds
            .iter()
            .enumerate()
            .map(|(i, round)| {
                format!("Round {}: {}", i + 1, if round.result { "Win" } else { "Lose" })
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
