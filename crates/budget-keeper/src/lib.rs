//! # budget-keeper
//! Per-block budget collection and governance parameter handling.

pub mod config;
pub mod keeper;
pub mod logging;

pub use config::KeeperConfig;
pub use keeper::{Collection, Keeper};
