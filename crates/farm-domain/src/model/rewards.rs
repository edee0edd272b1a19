//! Rewards - Quests, achievements, season passes and gacha bonuses

/// A daily quest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub code: String,
    pub done: bool,
}

/// An achievement entry, possibly tied to a breeding collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub quest_id: u64,
    /// Group the backend files it under (e.g. `MIX_PET`)
    pub category: String,
    pub completed: bool,
    pub claimed: bool,
    /// Encoded (father, mother) target for collection achievements
    pub collection_code: Option<u64>,
}

/// Category holding the breeding collection achievements
pub const MIX_PET_CATEGORY: &str = "MIX_PET";

/// A free reward step of a season pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonReward {
    pub step: u32,
    pub claimed: bool,
    pub amount: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonPass {
    pub season_id: u64,
    pub current_step: u32,
    pub title: String,
    pub free_rewards: Vec<SeasonReward>,
}

/// Milestone progress of one gacha kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GachaBonusProgress {
    pub current_step: u32,
    pub step_bonus_god_power: u32,
    pub step_bonus_dna: u32,
    pub claimed_god_power: bool,
    pub claimed_dna: bool,
}
