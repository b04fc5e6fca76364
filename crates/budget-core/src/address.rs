//! Account addresses and module account derivation.
//!
//! Addresses are raw byte strings (20 bytes for key accounts, 32 bytes for
//! module-derived accounts) rendered with Bech32 ([BIP-173]) under the
//! [`ACCOUNT_HRP`] prefix, e.g. `cosmos1...`.
//!
//! Module-owned source accounts are derived deterministically from a module
//! name and a purpose string; see [`derive_address`].
//!
//! [BIP-173]: https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ACCOUNT_HRP, MAX_ADDRESS_LEN, MAX_BECH32_LEN};
use crate::error::AddressError;

/// Bech32 checksum constant (BIP-173).
const BECH32_CONST: u32 = 1;

/// Bech32 character set for encoding 5-bit values.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// An account address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Vec<u8>);

impl Address {
    /// Wrap raw address bytes (1 to 255 bytes).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
        let bytes = bytes.into();
        if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::InvalidLength);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode under the account prefix.
    pub fn encode(&self) -> String {
        self.encode_with_hrp(ACCOUNT_HRP)
    }

    /// Encode as a Bech32 string with an arbitrary human-readable prefix.
    pub fn encode_with_hrp(&self, hrp: &str) -> String {
        let data = to_base32(&self.0);
        let checksum = bech32_create_checksum(hrp, &data);

        let mut result = String::with_capacity(hrp.len() + 1 + data.len() + 6);
        result.push_str(hrp);
        result.push('1');
        for &d in data.iter().chain(checksum.iter()) {
            result.push(CHARSET[d as usize] as char);
        }
        result
    }

    /// Decode a Bech32 string carrying the account prefix.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        Self::decode_with_hrp(s, ACCOUNT_HRP)
    }

    /// Decode a Bech32 string, requiring the given human-readable prefix.
    pub fn decode_with_hrp(s: &str, expected_hrp: &str) -> Result<Self, AddressError> {
        if s.trim().is_empty() {
            return Err(AddressError::Empty);
        }
        if s.len() > MAX_BECH32_LEN {
            return Err(AddressError::InvalidLength);
        }

        // Reject mixed case (all alpha chars must be same case)
        let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(AddressError::MixedCase);
        }
        let s_lower = s.to_ascii_lowercase();

        let sep_pos = s_lower.rfind('1').ok_or(AddressError::MissingSeparator)?;
        // Need at least 6 checksum chars after separator
        if sep_pos + 7 > s_lower.len() {
            return Err(AddressError::InvalidLength);
        }

        let hrp = &s_lower[..sep_pos];
        if hrp != expected_hrp {
            return Err(AddressError::InvalidHrp {
                expected: expected_hrp.to_string(),
                got: hrp.to_string(),
            });
        }

        let mut data = Vec::with_capacity(s_lower.len() - sep_pos - 1);
        for c in s_lower[sep_pos + 1..].chars() {
            let pos = CHARSET
                .iter()
                .position(|&ch| ch as char == c)
                .ok_or(AddressError::InvalidCharacter(c))?;
            data.push(pos as u8);
        }

        if !bech32_verify_checksum(hrp, &data) {
            return Err(AddressError::InvalidChecksum);
        }

        let payload = &data[..data.len() - 6];
        let bytes = from_base32(payload).ok_or(AddressError::InvalidPadding)?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}

// --- Module account derivation ---

/// Length variant used by [`derive_address`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// `sha256(module_name || purpose)[..20]`
    Bytes20,
    /// `sha256(sha256("module") || module_name || 0x00 || purpose)`
    Bytes32,
}

/// Derive a module-owned account address from a module name and a purpose.
///
/// ```
/// use budget_core::address::{derive_address, AddressType};
/// let pool = derive_address(AddressType::Bytes32, "budget", "InflationPool");
/// assert_eq!(
///     pool.to_string(),
///     "cosmos10wy60v3zuks7rkwnqxs3e878zqfhus6m98l77q6rppz40kxwgllsruc0az"
/// );
/// ```
pub fn derive_address(address_type: AddressType, module_name: &str, purpose: &str) -> Address {
    match address_type {
        AddressType::Bytes20 => {
            let digest = Sha256::new()
                .chain_update(module_name.as_bytes())
                .chain_update(purpose.as_bytes())
                .finalize();
            Address(digest[..20].to_vec())
        }
        AddressType::Bytes32 => {
            let type_hash = Sha256::digest(b"module");
            let digest = Sha256::new()
                .chain_update(type_hash)
                .chain_update(module_name.as_bytes())
                .chain_update([0u8])
                .chain_update(purpose.as_bytes())
                .finalize();
            Address(digest.to_vec())
        }
    }
}

// --- Bech32 internals ---

/// Compute the Bech32 polymod over a sequence of 5-bit values.
fn bech32_polymod(values: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    let mut chk: u32 = 1;
    for &v in values {
        let b = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (v as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (b >> i) & 1 != 0 {
                chk ^= g;
            }
        }
    }
    chk
}

fn bech32_hrp_expand(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    ret.extend(hrp.bytes().map(|c| c >> 5));
    ret.push(0);
    ret.extend(hrp.bytes().map(|c| c & 31));
    ret
}

fn bech32_create_checksum(hrp: &str, data: &[u8]) -> [u8; 6] {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; 6]);
    let polymod = bech32_polymod(&values) ^ BECH32_CONST;
    let mut checksum = [0u8; 6];
    for (i, c) in checksum.iter_mut().enumerate() {
        *c = ((polymod >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn bech32_verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    bech32_polymod(&values) == BECH32_CONST
}

/// Regroup bytes into padded 5-bit values.
fn to_base32(data: &[u8]) -> Vec<u8> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::with_capacity((data.len() * 8).div_ceil(5));
    for &value in data {
        acc = (acc << 8) | u32::from(value);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            ret.push(((acc >> bits) & 31) as u8);
        }
    }
    if bits > 0 {
        ret.push(((acc << (5 - bits)) & 31) as u8);
    }
    ret
}

/// Regroup 5-bit values into bytes; `None` on non-zero or oversized padding.
fn from_base32(data: &[u8]) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::with_capacity(data.len() * 5 / 8);
    for &value in data {
        acc = ((acc << 5) | u32::from(value)) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            ret.push(((acc >> bits) & 0xff) as u8);
        }
    }
    if bits >= 5 || ((acc << (8 - bits)) & 0xff) != 0 {
        return None;
    }
    Some(ret)
}
