//! In-memory [`BankKeeper`] implementation.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::coins::Coins;
use crate::error::BankError;
use crate::traits::BankKeeper;

/// Account balances held in memory. Used by tests and simulations.
#[derive(Clone, Debug, Default)]
pub struct MemoryBank {
    balances: BTreeMap<Address, Coins>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `coins` into `address`.
    pub fn fund_account(&mut self, address: &Address, coins: &Coins) -> Result<(), BankError> {
        let current = self.get_all_balances(address);
        let next = current
            .add(coins)
            .map_err(|e| BankError::Overflow(e.to_string()))?;
        self.put(address, next);
        Ok(())
    }

    /// Sum of every account balance.
    pub fn total_supply(&self) -> Result<Coins, BankError> {
        self.balances.values().try_fold(Coins::empty(), |acc, c| {
            acc.add(c).map_err(|e| BankError::Overflow(e.to_string()))
        })
    }

    fn put(&mut self, address: &Address, coins: Coins) {
        if coins.is_empty() {
            self.balances.remove(address);
        } else {
            self.balances.insert(address.clone(), coins);
        }
    }
}

impl BankKeeper for MemoryBank {
    fn get_all_balances(&self, address: &Address) -> Coins {
        self.balances.get(address).cloned().unwrap_or_default()
    }

    fn send_coins(&mut self, from: &Address, to: &Address, coins: &Coins) -> Result<(), BankError> {
        let from_balance = self.get_all_balances(from);
        let remaining = from_balance
            .checked_sub(coins)
            .ok_or_else(|| BankError::InsufficientFunds {
                address: from.to_string(),
                have: from_balance.to_string(),
                need: coins.to_string(),
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .get_all_balances(to)
            .add(coins)
            .map_err(|e| BankError::Overflow(e.to_string()))?;
        self.put(from, remaining);
        self.put(to, credited);
        Ok(())
    }
}
