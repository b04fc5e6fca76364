//! Budget keeper: per-block collection and governance parameter changes.
//!
//! The [`Keeper`] owns a [`BudgetStore`] and borrows the host's
//! [`BankKeeper`] for each block. Collection for one block:
//!
//! 1. `epoch_blocks == 0` disables collection outright.
//! 2. With `enforce_epoch_cadence`, blocks whose height is not a multiple of
//!    `epoch_blocks` are skipped.
//! 3. Budgets active at the block time are grouped by source.
//! 4. Each source's balance is read once; every budget of the group takes
//!    `floor(balance * rate)` of that snapshot, so shares never compound
//!    within a block.
//!
//! Any bank or store failure aborts the collection and is returned to the
//! host, whose transaction boundary rolls back the transfers already made.

use tracing::{debug, info, info_span, warn};

use budget_core::address::{derive_address, Address, AddressType};
use budget_core::budget::{budgets_by_source, collectible_budgets};
use budget_core::coins::Coins;
use budget_core::error::ModuleError;
use budget_core::params::{ParamChange, Params};
use budget_core::traits::{BankKeeper, BlockContext, BudgetStore};

use crate::config::KeeperConfig;

/// One transfer performed by the collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub budget_name: String,
    pub source: Address,
    pub destination: Address,
    pub coins: Coins,
}

/// Budget module keeper.
pub struct Keeper<S: BudgetStore> {
    store: S,
    config: KeeperConfig,
}

impl<S: BudgetStore> Keeper<S> {
    pub fn new(store: S, config: KeeperConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Deterministic 32-byte module account for `purpose`.
    pub fn module_address(&self, purpose: &str) -> Address {
        derive_address(AddressType::Bytes32, &self.config.module_name, purpose)
    }

    // --- params ---

    pub fn get_params(&self) -> Result<Params, ModuleError> {
        self.store.get_params()
    }

    /// Validate and store `params`, e.g. at genesis.
    pub fn set_params(&mut self, params: Params) -> Result<(), ModuleError> {
        params.validate()?;
        self.store.set_params(params)
    }

    /// Apply governance changes in order, committing only if all are accepted.
    ///
    /// On error the stored parameters are untouched.
    pub fn handle_param_changes(&mut self, changes: &[ParamChange]) -> Result<Params, ModuleError> {
        let mut next = self.store.get_params()?;
        for change in changes {
            next = match next.with_change(change) {
                Ok(params) => params,
                Err(e) => {
                    warn!(subspace = %change.subspace, key = %change.key, "budget: rejected parameter change: {e}");
                    return Err(e.into());
                }
            };
        }
        self.store.set_params(next.clone())?;
        info!(
            changes = changes.len(),
            budgets = next.budgets.len(),
            epoch_blocks = next.epoch_blocks,
            "budget: parameters updated"
        );
        Ok(next)
    }

    // --- counters ---

    pub fn get_total_collected_coins(&self, name: &str) -> Result<Option<Coins>, ModuleError> {
        self.store.get_total_collected_coins(name)
    }

    pub fn set_total_collected_coins(&mut self, name: &str, coins: Coins) -> Result<(), ModuleError> {
        self.store.set_total_collected_coins(name, coins)
    }

    pub fn add_total_collected_coins(&mut self, name: &str, coins: &Coins) -> Result<(), ModuleError> {
        self.store.add_total_collected_coins(name, coins)
    }

    /// Every recorded counter in ascending name order.
    pub fn all_total_collected_coins(&self) -> Result<Vec<(String, Coins)>, ModuleError> {
        let mut out = Vec::new();
        self.store.iterate_all_total_collected_coins(&mut |name, coins| {
            out.push((name.to_string(), coins.clone()));
            false
        })?;
        Ok(out)
    }

    // --- collection ---

    /// Per-block hook. Runs [`collect_budgets`](Self::collect_budgets) inside a
    /// span carrying the block height.
    pub fn begin_block<B: BankKeeper>(
        &mut self,
        bank: &mut B,
        ctx: &BlockContext,
    ) -> Result<Vec<Collection>, ModuleError> {
        let span = info_span!("begin_block", height = ctx.height);
        let _enter = span.enter();
        self.collect_budgets(bank, ctx)
    }

    /// Collect every budget active at `ctx.time`, returning the transfers
    /// in the order they were made.
    pub fn collect_budgets<B: BankKeeper>(
        &mut self,
        bank: &mut B,
        ctx: &BlockContext,
    ) -> Result<Vec<Collection>, ModuleError> {
        let params = self.store.get_params()?;
        if params.epoch_blocks == 0 {
            debug!("budget: collection disabled");
            return Ok(Vec::new());
        }
        if self.config.enforce_epoch_cadence && ctx.height % u64::from(params.epoch_blocks) != 0 {
            debug!(epoch_blocks = params.epoch_blocks, "budget: off-cadence block");
            return Ok(Vec::new());
        }

        let active = collectible_budgets(&params.budgets, ctx.time);
        if active.is_empty() {
            debug!("budget: no active budgets");
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for group in budgets_by_source(active) {
            let source = Address::decode(&group.source_address)?;
            let balance = bank.get_all_balances(&source);
            if balance.is_empty() {
                debug!(source = %group.source_address, "budget: empty source balance");
                continue;
            }

            for budget in group.budgets {
                let share = balance.mul_dec_truncate(budget.rate);
                if share.is_empty() {
                    continue;
                }
                let destination = Address::decode(&budget.destination_address)?;
                bank.send_coins(&source, &destination, &share)?;
                self.store.add_total_collected_coins(&budget.name, &share)?;
                debug!(
                    budget = %budget.name,
                    %source,
                    %destination,
                    coins = %share,
                    "budget: collected"
                );
                collections.push(Collection {
                    budget_name: budget.name.clone(),
                    source: source.clone(),
                    destination,
                    coins: share,
                });
            }
        }

        info!(collections = collections.len(), "budget: block collection complete");
        Ok(collections)
    }
}
