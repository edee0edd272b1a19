//! # Animix Farm Shared
//!
//! Configuration and error types used across all farm crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
