//! Fixed-point decimal with 18 fractional digits.
//!
//! [`Dec`] stores a signed 128-bit integer scaled by `10^18`. Rates only ever
//! need the range `[0, 1]`, but the signed representation lets a negative
//! governance value survive decoding so validation can reject it with a
//! proper [`BudgetError`](crate::error::BudgetError).
//!
//! All arithmetic is integer-only; multiplication against coin amounts
//! truncates toward zero so every replica computes identical results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEC_ONE_RAW, DEC_PRECISION};
use crate::error::DecError;

/// A fixed-point decimal number (`raw / 10^18`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(i128);

impl Dec {
    /// `0.0`
    pub const ZERO: Self = Self(0);
    /// `1.0`
    pub const ONE: Self = Self(DEC_ONE_RAW);

    /// Build a decimal from its raw scaled value.
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// The raw scaled value (`self * 10^18`).
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// `value * 10^-prec`, e.g. `new_with_prec(5, 2) == 0.05`.
    pub fn new_with_prec(value: i64, prec: u32) -> Result<Self, DecError> {
        if prec > DEC_PRECISION {
            return Err(DecError::TooManyDecimals {
                got: prec as usize,
                max: DEC_PRECISION as usize,
            });
        }
        // |i64| * 10^18 always fits in i128.
        Ok(Self(value as i128 * 10i128.pow(DEC_PRECISION - prec)))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// `floor(amount * self)` for a non-negative decimal.
    ///
    /// Splits `amount` into whole and fractional multiples of `10^18` so the
    /// product is exact and never overflows for `self <= 1`. Negative values
    /// yield 0; larger rates saturate at `u128::MAX`.
    pub fn mul_truncate(self, amount: u128) -> u128 {
        if self.0 <= 0 {
            return 0;
        }
        let rate = self.0 as u128;
        let one = DEC_ONE_RAW as u128;
        let whole = amount / one;
        let frac = amount % one;
        whole
            .saturating_mul(rate)
            .saturating_add(frac.saturating_mul(rate) / one)
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() {
                    return Err(DecError::Empty);
                }
                (int_part, frac_part)
            }
            None => (body, ""),
        };
        if int_part.is_empty() {
            return Err(DecError::Empty);
        }
        if frac_part.len() > DEC_PRECISION as usize {
            return Err(DecError::TooManyDecimals {
                got: frac_part.len(),
                max: DEC_PRECISION as usize,
            });
        }
        if let Some(c) = int_part
            .chars()
            .chain(frac_part.chars())
            .find(|c| !c.is_ascii_digit())
        {
            return Err(DecError::InvalidCharacter(c));
        }

        let mut int_value: i128 = 0;
        for b in int_part.bytes() {
            int_value = int_value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(b - b'0')))
                .ok_or(DecError::Overflow)?;
        }
        let mut frac_value: i128 = 0;
        for b in frac_part.bytes() {
            frac_value = frac_value * 10 + i128::from(b - b'0');
        }
        frac_value *= 10i128.pow(DEC_PRECISION - frac_part.len() as u32);

        let raw = int_value
            .checked_mul(DEC_ONE_RAW)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or(DecError::Overflow)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let one = DEC_ONE_RAW as u128;
        write!(f, "{sign}{}.{:018}", abs / one, abs % one)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
