//! Outbound adapters - The game backend

pub mod game_gateway;
pub mod http_client;
