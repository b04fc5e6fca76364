//! Shared test helpers for integration and property tests.

use chrono::{DateTime, Utc};

use budget_core::address::Address;
use budget_core::bank::MemoryBank;
use budget_core::budget::{parse_rfc3339, Budget};
use budget_core::coins::Coins;
use budget_core::error::ModuleError;
use budget_core::params::{ParamChange, Params};
use budget_core::store::MemoryBudgetStore;
use budget_core::traits::{BankKeeper, BlockContext};
use budget_keeper::{Collection, Keeper, KeeperConfig};

/// Source accounts: 20 bytes of `0x10 + i`.
pub const SOURCES: [&str; 4] = [
    "cosmos1zqgpqyqszqgpqyqszqgpqyqszqgpqyqsqdkrcw",
    "cosmos1zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3pahzj0",
    "cosmos1zgfpyysjzgfpyysjzgfpyysjzgfpyysjse38ee",
    "cosmos1zvf3xycnzvf3xycnzvf3xycnzvf3xycn3fsxnc",
];

/// Destination accounts: 20 bytes of `0x20 + i`.
pub const DESTINATIONS: [&str; 4] = [
    "cosmos1yqszqgpqyqszqgpqyqszqgpqyqszqgpq754qm0",
    "cosmos1yysjzgfpyysjzgfpyysjzgfpyysjzgfply5p3w",
    "cosmos1yg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zwqjy6c",
    "cosmos1yv3jxgeryv3jxgeryv3jxgeryv3jxger0sn9se",
];

/// `derive_address(Bytes32, "budget", "InflationPool")`.
pub const INFLATION_POOL: &str =
    "cosmos10wy60v3zuks7rkwnqxs3e878zqfhus6m98l77q6rppz40kxwgllsruc0az";

/// 32-byte farming destinations.
pub const FARMING_DESTINATIONS: [&str; 3] = [
    "cosmos1qceyjmnrl6hapntjq3z25vn38nh68u7yxvufs2thptxvqm7huxeqj7zyrq",
    "cosmos1czyx0dj2yd26gv3stpxzv23ddy8pld4j6p90a683mdcg8vzy72jqa8tm6p",
    "cosmos1e0n8jmeg4u8q3es2tmhz5zlte8a4q8687ndns8pj4q8grdl74a0sw3045s",
];

/// Balance minted into every funded source.
pub const INITIAL_BALANCE: &str =
    "1000000000denom1,1000000000denom2,1000000000denom3,1000000000stake";

/// Balance of the last source, too small to split evenly in most denoms.
pub const SMALL_BALANCE: &str = "1denom1,2denom2,3denom3,1000000000stake";

/// Parse a coin list, panicking on malformed input.
pub fn coins(s: &str) -> Coins {
    s.parse().expect("valid coins")
}

/// Parse an RFC 3339 instant, panicking on malformed input.
pub fn t(s: &str) -> DateTime<Utc> {
    parse_rfc3339(s).expect("valid timestamp")
}

/// Parse a Bech32 account, panicking on malformed input.
pub fn addr(s: &str) -> Address {
    s.parse().expect("valid address")
}

/// Build a budget from literal fields.
pub fn budget(name: &str, rate: &str, source: &str, destination: &str, start: &str, end: &str) -> Budget {
    Budget {
        name: name.to_string(),
        rate: rate.parse().expect("valid rate"),
        source_address: source.to_string(),
        destination_address: destination.to_string(),
        start_time: t(start),
        end_time: t(end),
    }
}

/// The six fixture budgets.
///
/// 0 and 1 split source 0 between destinations 0 and 1; 2 drains source 1
/// into destination 2; 3 is a full-rate budget on source 2 that expired in
/// 2021; 4 and 5 split the small source 3 between destinations 0 and 1.
pub fn fixture_budgets() -> Vec<Budget> {
    vec![
        budget("budget1", "0.5", SOURCES[0], DESTINATIONS[0], "0000-01-01T00:00:00Z", "9999-12-31T00:00:00Z"),
        budget("budget2", "0.5", SOURCES[0], DESTINATIONS[1], "0000-01-01T00:00:00Z", "9999-12-31T00:00:00Z"),
        budget("budget3", "1.0", SOURCES[1], DESTINATIONS[2], "0000-01-01T00:00:00Z", "9999-12-31T00:00:00Z"),
        budget("budget4", "1", SOURCES[2], DESTINATIONS[3], "0000-01-01T00:00:00Z", "0000-01-02T00:00:00Z"),
        budget("budget5", "0.5", SOURCES[3], DESTINATIONS[0], "0000-01-01T00:00:00Z", "9999-12-31T00:00:00Z"),
        budget("budget6", "0.5", SOURCES[3], DESTINATIONS[1], "0000-01-01T00:00:00Z", "9999-12-31T00:00:00Z"),
    ]
}

/// A keeper, a bank and a block clock.
pub struct TestApp {
    pub keeper: Keeper<MemoryBudgetStore>,
    pub bank: MemoryBank,
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl TestApp {
    /// Default params, empty bank, height 1 at 2021-08-31.
    pub fn new() -> Self {
        Self {
            keeper: Keeper::new(MemoryBudgetStore::default(), KeeperConfig::default()),
            bank: MemoryBank::new(),
            height: 1,
            time: t("2021-08-31T00:00:00Z"),
        }
    }

    /// Sources 0..=2 hold [`INITIAL_BALANCE`], source 3 holds [`SMALL_BALANCE`].
    pub fn with_funded_sources() -> Self {
        let mut app = Self::new();
        for source in &SOURCES[..3] {
            app.fund(source, INITIAL_BALANCE);
        }
        app.fund(SOURCES[3], SMALL_BALANCE);
        app
    }

    pub fn ctx(&self) -> BlockContext {
        BlockContext::new(self.height, self.time)
    }

    pub fn fund(&mut self, address: &str, amount: &str) {
        self.bank
            .fund_account(&addr(address), &coins(amount))
            .expect("funding overflow");
    }

    pub fn balance(&self, address: &str) -> Coins {
        self.bank.get_all_balances(&addr(address))
    }

    pub fn params(&self) -> Params {
        self.keeper.get_params().expect("params")
    }

    /// Replace budgets and cadence, bypassing governance.
    pub fn set_budgets(&mut self, budgets: Vec<Budget>, epoch_blocks: u32) {
        self.keeper
            .set_params(Params { budgets, epoch_blocks })
            .expect("valid params");
    }

    pub fn govern(&mut self, changes: &[ParamChange]) -> Result<Params, ModuleError> {
        self.keeper.handle_param_changes(changes)
    }

    /// Run the collector for the current block.
    pub fn collect(&mut self) -> Result<Vec<Collection>, ModuleError> {
        let ctx = self.ctx();
        self.keeper.begin_block(&mut self.bank, &ctx)
    }

    /// Advance to the next height at `time` and collect.
    pub fn next_block(&mut self, time: &str) -> Result<Vec<Collection>, ModuleError> {
        self.height += 1;
        self.time = t(time);
        self.collect()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
