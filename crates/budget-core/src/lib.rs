//! # budget-core
//! Foundation types and traits for the budget module.

pub mod address;
pub mod bank;
pub mod budget;
pub mod coins;
pub mod constants;
pub mod dec;
pub mod error;
pub mod params;
pub mod store;
pub mod traits;
