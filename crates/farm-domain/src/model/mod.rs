//! Domain Models - The vocabulary of the farm
//!
//! These types mirror what the game backend reports about an account,
//! reduced to the fields the planners actually look at.

pub mod account;
pub mod battle;
pub mod breeding;
pub mod mission;
pub mod pet;
pub mod rewards;
