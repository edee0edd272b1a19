//! Persistence Adapters - Local files read at start-up or shared by workers

pub mod catalog;
pub mod session_store;
pub mod user_agent_store;
