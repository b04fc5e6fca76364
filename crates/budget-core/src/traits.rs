//! Collaborator interfaces for the budget engine.
//!
//! These traits define the contracts between the engine and its host:
//! - [`BankKeeper`]: the value-transfer ledger (the host implements)
//! - [`BudgetStore`]: persistence of parameters and lifetime counters
//!
//! [`BlockContext`] carries the per-block clock the host hands to the collector.

use chrono::{DateTime, Utc};

use crate::address::Address;
use crate::coins::Coins;
use crate::error::{BankError, ModuleError};
use crate::params::Params;

/// The host's view of the block being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Monotone block height.
    pub height: u64,
    /// Block wall-clock time.
    pub time: DateTime<Utc>,
}

impl BlockContext {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }
}

/// Multi-denomination balance ledger.
///
/// All transfers issued within one block must be atomic with respect to the
/// host's transaction boundary; the engine never retries a failed transfer.
pub trait BankKeeper {
    /// Every balance held by `address`. Unknown accounts hold the empty bag.
    fn get_all_balances(&self, address: &Address) -> Coins;

    /// Move `coins` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`BankError::InsufficientFunds`] if `from` does not cover `coins`; in
    /// that case no balance changes.
    fn send_coins(&mut self, from: &Address, to: &Address, coins: &Coins) -> Result<(), BankError>;
}

/// Persistence surface for parameters and per-budget lifetime counters.
///
/// Counters distinguish *absent* (`None`) from *present but empty*
/// (`Some(Coins::empty())`); callers may rely on absence to detect a
/// budget's first collection.
pub trait BudgetStore {
    /// The stored parameter set.
    fn get_params(&self) -> Result<Params, ModuleError>;

    /// Overwrite the parameter set. Performs no validation.
    fn set_params(&mut self, params: Params) -> Result<(), ModuleError>;

    /// Lifetime collected coins for `name`, or `None` if never written.
    fn get_total_collected_coins(&self, name: &str) -> Result<Option<Coins>, ModuleError>;

    /// Overwrite the counter for `name`.
    fn set_total_collected_coins(&mut self, name: &str, coins: Coins) -> Result<(), ModuleError>;

    /// `set(name, get(name) + coins)`.
    ///
    /// Default implementation composes [`get_total_collected_coins`](Self::get_total_collected_coins)
    /// and [`set_total_collected_coins`](Self::set_total_collected_coins).
    fn add_total_collected_coins(&mut self, name: &str, coins: &Coins) -> Result<(), ModuleError> {
        let current = self.get_total_collected_coins(name)?.unwrap_or_default();
        let total = current.add(coins)?;
        self.set_total_collected_coins(name, total)
    }

    /// Visit every counter in ascending name order until `f` returns `true`.
    fn iterate_all_total_collected_coins(
        &self,
        f: &mut dyn FnMut(&str, &Coins) -> bool,
    ) -> Result<(), ModuleError>;
}
