//! # Core Domain Entities
//!
//! Primitive value types shared across the oracle subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`] for signers, controllers, contracts and endpoints
//! - **Hashing**: [`Hash`] (Keccak-256 output)
//! - **Accounting**: [`Amount`], [`ChainId`], [`Timestamp`]
//! - **Price Feed**: [`AssetIndex`], [`Price`], [`RequestId`]

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte Ethereum-style account identity.
///
/// Renders as `0x`-prefixed lowercase hex. Serializes as a hex string for
/// human-readable formats (JSON config) and as raw bytes otherwise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null identity. Never a valid signer, controller or endpoint.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// True for the null identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Build from a slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressParseError> {
        let raw: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AddressParseError::InvalidLength(bytes.len()))?;
        Ok(Self(raw))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Errors parsing an [`Address`] from text or bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// Input was not valid hex.
    #[error("invalid address hex: {0}")]
    InvalidHex(String),

    /// Decoded input was not 20 bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes =
            hex::decode(trimmed).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(D::Error::custom)
        } else {
            <[u8; 20]>::deserialize(deserializer).map(Address)
        }
    }
}

// =============================================================================
// CLUSTER B: HASHING & ACCOUNTING
// =============================================================================

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Fee and value amounts in the smallest native unit.
pub type Amount = u128;

/// Numeric chain identity (EIP-155 style).
pub type ChainId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER C: PRICE FEED
// =============================================================================

/// Monotonic, 1-based price request identifier. `0` means "none".
pub type RequestId = u64;

/// Index of a priced asset (e.g. BTC = 0, ETH = 1).
pub type AssetIndex = u16;

/// Fixed-point price scaled by [`PRICE_SCALE`].
pub type Price = u64;

/// Decimal places carried by every [`Price`].
pub const PRICE_DECIMALS: u8 = 8;

/// `10^PRICE_DECIMALS`.
pub const PRICE_SCALE: u64 = 100_000_000;

/// Largest price representable in the 6-byte wire encoding.
pub const MAX_ENCODED_PRICE: Price = (1 << 48) - 1;
