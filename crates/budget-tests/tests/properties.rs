//! Property-based tests for collection and validation invariants.
//!
//! Each property runs 256 cases with proptest shrinking.
//!
//! Properties tested:
//! - Every destination receives exactly `floor(snapshot * rate)` per denom
//! - A source never pays out more than its pre-block balance
//! - Lifetime counters grow by exactly the delivered amount
//! - The active-set selector is a pure, order-preserving filter
//! - Accepted budget lists never over-commit a source at any instant
//! - A zero cadence freezes every balance

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use budget_core::budget::{collectible_budgets, validate_budgets, Budget};
use budget_core::coins::{Coin, Coins};
use budget_core::constants::DEC_ONE_RAW;
use budget_core::dec::Dec;
use budget_core::error::BudgetError;
use budget_tests::helpers::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const DENOMS: [&str; 4] = ["denom1", "denom2", "denom3", "stake"];

fn base_time() -> DateTime<Utc> {
    t("2021-09-01T00:00:00Z")
}

/// A balance over the fixture denoms, small amounts included.
fn arb_balance() -> impl Strategy<Value = Coins> {
    prop::collection::vec(
        prop_oneof![0u128..10, 0u128..1_000_000_000_000_000],
        DENOMS.len(),
    )
    .prop_map(|amounts| {
        Coins::new(DENOMS.iter().zip(amounts).map(|(d, a)| Coin::new(*d, a))).unwrap()
    })
}

/// Up to four rates whose sum never exceeds one.
fn arb_rates() -> impl Strategy<Value = Vec<Dec>> {
    (1usize..=4).prop_flat_map(|n| {
        let cap = DEC_ONE_RAW / n as i128;
        prop::collection::vec(0..=cap, n)
            .prop_map(|raws| raws.into_iter().map(Dec::from_raw).collect::<Vec<Dec>>())
    })
}

fn always_active(name: String, rate: Dec, source: &str, destination: &str) -> Budget {
    Budget {
        name,
        rate,
        source_address: source.to_string(),
        destination_address: destination.to_string(),
        start_time: t("0000-01-01T00:00:00Z"),
        end_time: t("9999-12-31T00:00:00Z"),
    }
}

/// Budgets on source 0 paying destinations 0..n in order.
fn budgets_for(rates: &[Dec]) -> Vec<Budget> {
    rates
        .iter()
        .enumerate()
        .map(|(i, rate)| always_active(format!("budget{i}"), *rate, SOURCES[0], DESTINATIONS[i]))
        .collect()
}

/// A budget with a day-granular interval on one of two sources.
fn arb_interval_budget() -> impl Strategy<Value = (usize, u8, i64, i64)> {
    (0usize..2, 0u8..=10, 0i64..30, 1i64..30)
}

fn interval_budget(i: usize, (source, tenths, start, len): (usize, u8, i64, i64)) -> Budget {
    let start_time = base_time() + Duration::days(start);
    Budget {
        name: format!("budget{i}"),
        rate: Dec::new_with_prec(i64::from(tenths), 1).unwrap(),
        source_address: SOURCES[source].to_string(),
        destination_address: DESTINATIONS[i % DESTINATIONS.len()].to_string(),
        start_time,
        end_time: start_time + Duration::days(len),
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Each destination gets `floor(snapshot * rate)` and the source pays
    /// exactly the sum of shares, never more than it held.
    #[test]
    fn shares_follow_snapshot(balance in arb_balance(), rates in arb_rates()) {
        let mut app = TestApp::new();
        app.set_budgets(budgets_for(&rates), 1);
        if !balance.is_empty() {
            app.bank.fund_account(&addr(SOURCES[0]), &balance).unwrap();
        }

        app.collect().unwrap();

        let mut paid = Coins::empty();
        for (i, rate) in rates.iter().enumerate() {
            let expected = balance.mul_dec_truncate(*rate);
            prop_assert_eq!(app.balance(DESTINATIONS[i]), expected.clone());
            paid = paid.add(&expected).unwrap();
        }
        prop_assert!(balance.is_all_gte(&paid));
        prop_assert_eq!(app.balance(SOURCES[0]), balance.checked_sub(&paid).unwrap());
    }

    /// Counters grow by exactly what each block delivered.
    #[test]
    fn counters_track_deliveries(
        first in arb_balance(),
        second in arb_balance(),
        rates in arb_rates(),
    ) {
        let mut app = TestApp::new();
        app.set_budgets(budgets_for(&rates), 1);

        let mut delivered: Vec<Coins> = vec![Coins::empty(); rates.len()];
        for inflow in [first, second] {
            if !inflow.is_empty() {
                app.bank.fund_account(&addr(SOURCES[0]), &inflow).unwrap();
            }
            let before: Vec<Option<Coins>> = (0..rates.len())
                .map(|i| app.keeper.get_total_collected_coins(&format!("budget{i}")).unwrap())
                .collect();

            let collections = app.next_block("2021-09-01T00:00:00Z").unwrap();

            for (i, prior) in before.into_iter().enumerate() {
                let name = format!("budget{i}");
                let block: Coins = collections
                    .iter()
                    .filter(|c| c.budget_name == name)
                    .try_fold(Coins::empty(), |acc, c| acc.add(&c.coins))
                    .unwrap();
                delivered[i] = delivered[i].add(&block).unwrap();

                let after = app.keeper.get_total_collected_coins(&name).unwrap();
                if block.is_empty() {
                    prop_assert_eq!(after, prior);
                } else {
                    let expected = prior.unwrap_or_default().add(&block).unwrap();
                    prop_assert_eq!(after, Some(expected));
                }
            }
        }

        for (i, total) in delivered.iter().enumerate() {
            prop_assert_eq!(&app.balance(DESTINATIONS[i]), total);
        }
    }

    /// A zero cadence never moves a coin, whatever the budgets and heights.
    #[test]
    fn zero_epoch_freezes_balances(
        balance in arb_balance(),
        rates in arb_rates(),
        heights in prop::collection::vec(1u64..1_000_000, 1..5),
    ) {
        let mut app = TestApp::new();
        app.set_budgets(budgets_for(&rates), 0);
        if !balance.is_empty() {
            app.bank.fund_account(&addr(SOURCES[0]), &balance).unwrap();
        }

        for height in heights {
            app.height = height;
            prop_assert!(app.collect().unwrap().is_empty());
        }

        prop_assert_eq!(app.balance(SOURCES[0]), balance);
        for destination in DESTINATIONS {
            prop_assert!(app.balance(destination).is_empty());
        }
        prop_assert!(app.keeper.all_total_collected_coins().unwrap().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Selection and validation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The selector keeps exactly the active budgets, in input order, and
    /// gives the same answer on every call.
    #[test]
    fn selector_is_stable_filter(
        shapes in prop::collection::vec(arb_interval_budget(), 0..8),
        day in 0i64..60,
        hours in 0i64..24,
    ) {
        let budgets: Vec<Budget> = shapes
            .into_iter()
            .enumerate()
            .map(|(i, shape)| interval_budget(i, shape))
            .collect();
        let at = base_time() + Duration::days(day) + Duration::hours(hours);

        let selected = collectible_budgets(&budgets, at);
        let expected: Vec<&Budget> = budgets
            .iter()
            .filter(|b| b.start_time <= at && at < b.end_time)
            .collect();
        prop_assert_eq!(&selected, &expected);
        prop_assert_eq!(collectible_budgets(&budgets, at), selected);
    }

    /// Accepted lists never let the active rates of one source exceed one,
    /// and lists whose per-source rate sum is at most one are always accepted.
    #[test]
    fn accepted_lists_never_overcommit(
        shapes in prop::collection::vec(arb_interval_budget(), 0..8),
    ) {
        let budgets: Vec<Budget> = shapes
            .into_iter()
            .enumerate()
            .map(|(i, shape)| interval_budget(i, shape))
            .collect();

        let per_source_sum = |source: &str| {
            budgets
                .iter()
                .filter(|b| b.source_address == source)
                .fold(Dec::ZERO, |acc, b| acc.saturating_add(b.rate))
        };
        let fast_ok = SOURCES[..2].iter().all(|s| per_source_sum(*s) <= Dec::ONE);

        match validate_budgets(&budgets) {
            Ok(()) => {
                for at in budgets.iter().map(|b| b.start_time) {
                    for source in &SOURCES[..2] {
                        let active = collectible_budgets(&budgets, at)
                            .into_iter()
                            .filter(|b| b.source_address == *source)
                            .fold(Dec::ZERO, |acc, b| acc.saturating_add(b.rate));
                        prop_assert!(active <= Dec::ONE, "{source} over-committed at {at}");
                    }
                }
            }
            Err(BudgetError::InvalidTotalBudgetRate { .. }) => prop_assert!(!fast_ok),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
