//! In-memory [`BudgetStore`] implementation.
//!
//! Keeps the parameter set and per-budget counters in memory with no
//! persistence. A host chain backs [`BudgetStore`] with its own key-value
//! store; this one is used by tests and simulations.

use std::collections::BTreeMap;

use crate::coins::Coins;
use crate::error::ModuleError;
use crate::params::Params;
use crate::traits::BudgetStore;

/// In-memory budget store for testing.
///
/// Counters are kept in a `BTreeMap` so iteration follows ascending name
/// order, matching a prefix scan over a sorted key-value store.
#[derive(Clone, Debug, Default)]
pub struct MemoryBudgetStore {
    params: Params,
    totals: BTreeMap<String, Coins>,
}

impl MemoryBudgetStore {
    /// Create a store holding `params` and no counters.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            totals: BTreeMap::new(),
        }
    }

    /// Number of budget names with a recorded counter.
    pub fn counter_count(&self) -> usize {
        self.totals.len()
    }
}

impl BudgetStore for MemoryBudgetStore {
    fn get_params(&self) -> Result<Params, ModuleError> {
        Ok(self.params.clone())
    }

    fn set_params(&mut self, params: Params) -> Result<(), ModuleError> {
        self.params = params;
        Ok(())
    }

    fn get_total_collected_coins(&self, name: &str) -> Result<Option<Coins>, ModuleError> {
        Ok(self.totals.get(name).cloned())
    }

    fn set_total_collected_coins(&mut self, name: &str, coins: Coins) -> Result<(), ModuleError> {
        self.totals.insert(name.to_string(), coins);
        Ok(())
    }

    fn iterate_all_total_collected_coins(
        &self,
        f: &mut dyn FnMut(&str, &Coins) -> bool,
    ) -> Result<(), ModuleError> {
        for (name, coins) in &self.totals {
            if f(name, coins) {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn params_roundtrip() {
        let mut store = MemoryBudgetStore::default();
        assert_eq!(store.get_params().unwrap(), Params::default());

        let params = Params {
            epoch_blocks: 5,
            ..Params::default()
        };
        store.set_params(params.clone()).unwrap();
        assert_eq!(store.get_params().unwrap(), params);
    }

    // --- counters ---

    #[test]
    fn absent_counter_is_none() {
        let store = MemoryBudgetStore::default();
        assert_eq!(store.get_total_collected_coins("budget1").unwrap(), None);
        assert_eq!(store.counter_count(), 0);
    }

    #[test]
    fn empty_counter_is_present() {
        let mut store = MemoryBudgetStore::default();
        store.set_total_collected_coins("budget1", Coins::empty()).unwrap();
        assert_eq!(
            store.get_total_collected_coins("budget1").unwrap(),
            Some(Coins::empty())
        );
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryBudgetStore::default();
        store.set_total_collected_coins("b", coins("5stake")).unwrap();
        store.set_total_collected_coins("b", coins("1denom1")).unwrap();
        assert_eq!(store.get_total_collected_coins("b").unwrap(), Some(coins("1denom1")));
    }

    #[test]
    fn add_accumulates() {
        let mut store = MemoryBudgetStore::default();
        store.add_total_collected_coins("b", &coins("5stake")).unwrap();
        store.add_total_collected_coins("b", &coins("5stake,2denom1")).unwrap();
        assert_eq!(
            store.get_total_collected_coins("b").unwrap(),
            Some(coins("2denom1,10stake"))
        );
    }

    #[test]
    fn iterate_in_name_order_with_stop() {
        let mut store = MemoryBudgetStore::default();
        for name in ["charlie", "alpha", "bravo"] {
            store.set_total_collected_coins(name, coins("1stake")).unwrap();
        }

        let mut seen = Vec::new();
        store
            .iterate_all_total_collected_coins(&mut |name, _| {
                seen.push(name.to_string());
                false
            })
            .unwrap();
        assert_eq!(seen, vec!["alpha", "bravo", "charlie"]);

        let mut seen = Vec::new();
        store
            .iterate_all_total_collected_coins(&mut |name, _| {
                seen.push(name.to_string());
                name == "bravo"
            })
            .unwrap();
        assert_eq!(seen, vec!["alpha", "bravo"]);
    }
}
