//! # Animix Farm Use Case Layer
//!
//! Application-specific flow: what to fetch, which planner to ask, and
//! what to submit, for one account at a time.
//!
//! ```text
//! AccountCycle ──fetch──▶ GameGateway (port)
//!      │
//!      ├──plan──▶ farm-domain planners (pure)
//!      │
//!      └──submit─▶ GameGateway (port)
//! ```

pub mod cycle;
pub mod dto;
pub mod pacer;
pub mod port;

pub use farm_domain;

pub use cycle::{AccountCycle, Catalogs, CycleReport, CycleSettings};
pub use pacer::Pacer;
pub use port::{ApiResult, GachaKind, GameGateway, UserAgentStore};
