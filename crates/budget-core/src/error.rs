//! Error types for the budget module.
use thiserror::Error;

use crate::dec::Dec;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecError {
    #[error("empty decimal string")] Empty,
    #[error("invalid character in decimal: {0:?}")] InvalidCharacter(char),
    #[error("too many fractional digits: {got} > {max}")] TooManyDecimals { got: usize, max: usize },
    #[error("decimal out of range")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinsError {
    #[error("invalid denom: {0}")] InvalidDenom(String),
    #[error("duplicate denom: {0}")] DuplicateDenom(String),
    #[error("invalid coin expression: {0}")] InvalidCoin(String),
    #[error("coin amount overflow for {0}")] Overflow(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")] Empty,
    #[error("invalid HRP: expected {expected}, got {got}")] InvalidHrp { expected: String, got: String },
    #[error("invalid length")] InvalidLength,
    #[error("invalid checksum")] InvalidChecksum,
    #[error("invalid character: {0}")] InvalidCharacter(char),
    #[error("invalid padding bits")] InvalidPadding,
    #[error("missing separator")] MissingSeparator,
    #[error("mixed case")] MixedCase,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BudgetError {
    #[error("invalid budget name: {0:?}")] InvalidBudgetName(String),
    #[error("invalid budget rate for {name}: {rate}")] InvalidBudgetRate { name: String, rate: Dec },
    #[error("end time must be after start time for budget {0}")] InvalidStartEndTime(String),
    #[error("source and destination are the same for budget {name}: {address}")] SameSourceDestination { name: String, address: String },
    #[error("duplicate budget name: {0}")] DuplicateBudgetName(String),
    #[error("invalid total budget rate for source {source_address}: {rate}")] InvalidTotalBudgetRate { source_address: String, rate: Dec },
    #[error("invalid address {address:?}: {reason}")] InvalidAddress { address: String, reason: AddressError },
    #[error("invalid parameter type for {key}: {reason}")] InvalidParameterType { key: String, reason: String },
    #[error("unknown parameter key: {0}")] UnknownParamKey(String),
    #[error("unknown parameter subspace: {0}")] UnknownSubspace(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds in {address}: have {have}, need {need}")] InsufficientFunds { address: String, have: String, need: String },
    #[error("balance overflow for {0}")] Overflow(String),
}

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)] Budget(#[from] BudgetError),
    #[error(transparent)] Coins(#[from] CoinsError),
    #[error(transparent)] Address(#[from] AddressError),
    #[error(transparent)] Bank(#[from] BankError),
    #[error("storage: {0}")] Storage(String),
}
