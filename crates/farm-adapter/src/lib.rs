//! # Animix Farm Adapter Layer
//!
//! Outbound adapters for the ports declared in `farm-usecase`.
//!
//! ## Structure
//!
//! - `gateway/` - Game API over HTTP (`reqwest`)
//! - `repository/` - Files: accounts, proxies, user agents, static catalogs
//! - `random` - `rand`-backed picker and delay jitter

pub mod gateway;
pub mod random;
pub mod repository;

pub use gateway::game_gateway::HttpGameGateway;
pub use gateway::http_client::{check_proxy_ip, ApiClient, ClientOptions, RequestOptions};
pub use random::{jitter, RandomPicker};
pub use repository::catalog::CatalogLoader;
pub use repository::session_store::FileSessionStore;
pub use repository::user_agent_store::FileUserAgentStore;
