//! Domain Services - Stateless planners
//!
//! Each planner is a pure function of (account snapshot, static catalogs).

pub mod battle_planner;
pub mod breeding_planner;
pub mod gacha;
pub mod mission_planner;
pub mod rewards;
