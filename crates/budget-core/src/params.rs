//! Module parameters and governance parameter changes.
//!
//! Two parameters live under the module's subspace:
//! - `Budgets`: JSON array of [`Budget`] objects.
//! - `EpochBlocks`: unsigned 32-bit collection cadence; `0` disables collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::budget::{validate_budgets, Budget};
use crate::constants::{DEFAULT_EPOCH_BLOCKS, KEY_BUDGETS, KEY_EPOCH_BLOCKS, MODULE_NAME};
use crate::error::BudgetError;

/// The complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub budgets: Vec<Budget>,
    pub epoch_blocks: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            budgets: Vec::new(),
            epoch_blocks: DEFAULT_EPOCH_BLOCKS,
        }
    }
}

impl Params {
    /// Validate the parameter set. Every `u32` cadence is acceptable, so only
    /// the budget list is checked.
    pub fn validate(&self) -> Result<(), BudgetError> {
        validate_budgets(&self.budgets)
    }

    /// Return a copy with `change` applied and validated.
    ///
    /// # Errors
    ///
    /// - [`BudgetError::UnknownSubspace`] if the change targets another module
    /// - [`BudgetError::UnknownParamKey`] for keys other than `Budgets`/`EpochBlocks`
    /// - [`BudgetError::InvalidParameterType`] if the JSON value does not decode
    /// - any [`validate_budgets`] error for a `Budgets` change
    pub fn with_change(&self, change: &ParamChange) -> Result<Params, BudgetError> {
        if change.subspace != MODULE_NAME {
            return Err(BudgetError::UnknownSubspace(change.subspace.clone()));
        }
        let key: ParamKey = change.key.parse()?;
        let mut next = self.clone();
        match key {
            ParamKey::Budgets => {
                let budgets: Vec<Budget> = decode_value(key, &change.value)?;
                validate_budgets(&budgets)?;
                next.budgets = budgets;
            }
            ParamKey::EpochBlocks => {
                next.epoch_blocks = decode_value(key, &change.value)?;
            }
        }
        Ok(next)
    }
}

fn decode_value<T: serde::de::DeserializeOwned>(key: ParamKey, value: &str) -> Result<T, BudgetError> {
    serde_json::from_str(value).map_err(|e| BudgetError::InvalidParameterType {
        key: key.as_str().to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Named parameter under the module subspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Budgets,
    EpochBlocks,
}

impl ParamKey {
    /// The bit-exact store key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::Budgets => KEY_BUDGETS,
            ParamKey::EpochBlocks => KEY_EPOCH_BLOCKS,
        }
    }
}

impl FromStr for ParamKey {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KEY_BUDGETS => Ok(ParamKey::Budgets),
            KEY_EPOCH_BLOCKS => Ok(ParamKey::EpochBlocks),
            _ => Err(BudgetError::UnknownParamKey(s.to_string())),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single governance parameter change: JSON `value` for `subspace`/`key`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamChange {
    pub subspace: String,
    pub key: String,
    pub value: String,
}

impl ParamChange {
    /// A change addressed to this module's subspace.
    pub fn new(key: ParamKey, value: impl Into<String>) -> Self {
        Self {
            subspace: MODULE_NAME.to_string(),
            key: key.as_str().to_string(),
            value: value.into(),
        }
    }
}
