//! Budget records, their validation, and the active-set selector.
//!
//! A [`Budget`] routes `rate` of its source account's balance to its
//! destination on every collection block while `start_time <= t < end_time`.
//! Intervals are half-open everywhere: in [`Budget::is_active_at`] and in
//! [`date_ranges_overlap`], so a budget ending at `T` and one starting at `T`
//! never compete for the same block.
//!
//! [`validate_budgets`] enforces, per source account, that the rates of
//! overlapping budgets never sum above one. The check has two phases:
//! - **Fast sum**: if the rates of all budgets sharing a source sum to at most
//!   one, no subset can exceed it.
//! - **Tight check**: otherwise, for each budget of the group, the rates of
//!   every group member whose interval overlaps it are summed and compared
//!   against one. This is conservative: two budgets that each overlap a long
//!   third budget but not each other are still counted together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::address::Address;
use crate::constants::MAX_BUDGET_NAME_LENGTH;
use crate::dec::Dec;
use crate::error::BudgetError;

/// A declarative rule routing a fraction of a source balance to a destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Budget {
    /// Permanent identifier; also keys the lifetime collection counter.
    pub name: String,
    /// Fraction of the source balance collected per block, in `[0, 1]`.
    pub rate: Dec,
    /// Bech32 account funding this budget.
    pub source_address: String,
    /// Bech32 account receiving collections.
    pub destination_address: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Budget {
    /// Check individual well-formedness.
    ///
    /// # Errors
    ///
    /// - [`BudgetError::InvalidBudgetName`] for empty, long or non-`[A-Za-z0-9_-]` names
    /// - [`BudgetError::InvalidBudgetRate`] if the rate is negative or above one
    /// - [`BudgetError::InvalidAddress`] if either address fails to decode
    /// - [`BudgetError::SameSourceDestination`] if both addresses are the same account
    /// - [`BudgetError::InvalidStartEndTime`] unless `end_time > start_time`
    pub fn validate(&self) -> Result<(), BudgetError> {
        validate_name(&self.name)?;

        if self.rate.is_negative() || self.rate > Dec::ONE {
            return Err(BudgetError::InvalidBudgetRate {
                name: self.name.clone(),
                rate: self.rate,
            });
        }

        let source = decode_address(&self.source_address)?;
        let destination = decode_address(&self.destination_address)?;
        if source == destination {
            return Err(BudgetError::SameSourceDestination {
                name: self.name.clone(),
                address: self.source_address.clone(),
            });
        }

        if self.end_time <= self.start_time {
            return Err(BudgetError::InvalidStartEndTime(self.name.clone()));
        }
        Ok(())
    }

    /// Whether the budget collects at `t` (`start_time <= t < end_time`).
    pub fn is_active_at(&self, t: DateTime<Utc>) -> bool {
        self.start_time <= t && t < self.end_time
    }
}

fn decode_address(address: &str) -> Result<Address, BudgetError> {
    Address::decode(address).map_err(|reason| BudgetError::InvalidAddress {
        address: address.to_string(),
        reason,
    })
}

/// Check a budget name: 1 to 50 characters from `[A-Za-z0-9_-]`.
pub fn validate_name(name: &str) -> Result<(), BudgetError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_BUDGET_NAME_LENGTH
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(BudgetError::InvalidBudgetName(name.to_string()))
    }
}

/// Whether the half-open ranges `[a_start, a_end)` and `[b_start, b_end)` share an instant.
pub fn date_ranges_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// The budgets active at `t`, in input order.
pub fn collectible_budgets(budgets: &[Budget], t: DateTime<Utc>) -> Vec<&Budget> {
    budgets.iter().filter(|b| b.is_active_at(t)).collect()
}

/// Budgets sharing one source account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetsBySource<'a> {
    /// Source address in canonical (lowercase) form.
    pub source_address: String,
    /// Members in input order.
    pub budgets: Vec<&'a Budget>,
    /// Sum of member rates.
    pub total_rate: Dec,
}

/// Group budgets by source address.
///
/// Groups appear in order of their first member; members keep input order.
/// Addresses are compared case-insensitively, as Bech32 strings are.
pub fn budgets_by_source<'a, I>(budgets: I) -> Vec<BudgetsBySource<'a>>
where
    I: IntoIterator<Item = &'a Budget>,
{
    let mut groups: Vec<BudgetsBySource<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for budget in budgets {
        let key = budget.source_address.to_ascii_lowercase();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(BudgetsBySource {
                    source_address: key,
                    budgets: Vec::new(),
                    total_rate: Dec::ZERO,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.total_rate = group.total_rate.saturating_add(budget.rate);
        group.budgets.push(budget);
    }
    groups
}

/// Validate a full budget list: each budget, unique names, and per-source rate sums.
///
/// # Errors
///
/// The first failure of [`Budget::validate`], [`BudgetError::DuplicateBudgetName`],
/// or [`BudgetError::InvalidTotalBudgetRate`] carrying the offending source and sum.
pub fn validate_budgets(budgets: &[Budget]) -> Result<(), BudgetError> {
    let mut names = HashSet::with_capacity(budgets.len());
    for budget in budgets {
        budget.validate()?;
        if !names.insert(budget.name.as_str()) {
            return Err(BudgetError::DuplicateBudgetName(budget.name.clone()));
        }
    }

    for group in budgets_by_source(budgets) {
        if group.total_rate <= Dec::ONE {
            continue;
        }
        for budget in &group.budgets {
            let total_rate = group
                .budgets
                .iter()
                .filter(|other| {
                    date_ranges_overlap(
                        budget.start_time,
                        budget.end_time,
                        other.start_time,
                        other.end_time,
                    )
                })
                .fold(Dec::ZERO, |acc, other| acc.saturating_add(other.rate));
            if total_rate > Dec::ONE {
                return Err(BudgetError::InvalidTotalBudgetRate {
                    source_address: group.source_address.clone(),
                    rate: total_rate,
                });
            }
        }
    }
    Ok(())
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&Utc))
}
