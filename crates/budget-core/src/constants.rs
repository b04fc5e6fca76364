//! Module constants. All rates are fixed-point with [`DEC_PRECISION`] fractional digits.

/// Name of the module; also the parameter subspace and the derivation namespace
/// for module-owned accounts.
pub const MODULE_NAME: &str = "budget";

/// Human-readable prefix of account addresses.
///
/// # Examples
///
/// ```
/// use budget_core::constants::ACCOUNT_HRP;
/// assert_eq!(ACCOUNT_HRP, "cosmos");
/// ```
pub const ACCOUNT_HRP: &str = "cosmos";

/// Maximum length of a budget name, in bytes.
pub const MAX_BUDGET_NAME_LENGTH: usize = 50;

/// Collection cadence used by [`Params::default`](crate::params::Params::default).
pub const DEFAULT_EPOCH_BLOCKS: u32 = 1;

/// Number of fractional digits carried by [`Dec`](crate::dec::Dec).
pub const DEC_PRECISION: u32 = 18;

/// `10^DEC_PRECISION`, the raw value of `1.0`.
pub const DEC_ONE_RAW: i128 = 1_000_000_000_000_000_000;

/// Parameter store key of the budget list.
pub const KEY_BUDGETS: &str = "Budgets";

/// Parameter store key of the collection cadence.
pub const KEY_EPOCH_BLOCKS: &str = "EpochBlocks";

/// Maximum byte length of an address payload.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Maximum length of a bech32 address string.
pub const MAX_BECH32_LEN: usize = 1023;
