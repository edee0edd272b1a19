//! # Animix Farm Domain Layer
//!
//! Pure selection logic with zero external dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/   - Pets, missions, opponents, DNA, rewards         ││
//! │  │  service/ - Planners (mission, battle, breeding, gacha)     ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **This crate never performs I/O.**
//!
//! Every planner takes a snapshot of the account and returns a selection
//! (or nothing). The caller fetches, submits and logs.

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::{
    account::AccountSession,
    battle::{Opponent, OpponentPet, PetCatalog},
    breeding::{DnaStack, NeededPair},
    mission::{ActiveMission, MissionCatalog, MissionId, MissionTemplate, SlotRequirement},
    pet::{PetClass, PetId, PetPool, PetStack, PetUnit, UnitIndex},
    rewards::{Achievement, GachaBonusProgress, Quest, SeasonPass, SeasonReward},
};

pub use service::{
    battle_planner::{select_battle_team, select_defense_team, BattleTeam, DefenseDecision, TeamSelection},
    breeding_planner::{BreedingPair, BreedingPlanner, BreedingPool, UnitPicker},
    gacha::{bonus_reward, BonusReward, GachaBudget},
    mission_planner::{MissionAssignment, MissionPlanner, MissionSession},
    rewards::{
        claimable_achievements, claimable_season_rewards, finished_missions, needed_pairs,
        pending_quests,
    },
};
