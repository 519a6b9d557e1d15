// crates/sequoia-core/src/types.rs
//
// Identifiers and amounts shared by every Sequoia crate.
//
// All reward and payment amounts are tracked in the ledger's smallest unit
// (u128), so 18-decimal token rates such as 15e18 per block fit without
// scaling tricks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SequoiaError;

/// Identifier of a farmable position (a token id in the position collection).
pub type PositionId = u64;

/// Block height of the hosting chain.
pub type BlockHeight = u64;

/// Amount in the smallest unit of the reward or payment asset.
pub type Amount = u128;

/// A 32-byte digest.
pub type Hash32 = [u8; 32];

/// A 20-byte account identity.
///
/// Displays and serializes as a `0x`-prefixed lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// The all-zero identity.
    pub const ZERO: Identity = Identity([0u8; 20]);

    /// Build an identity whose bytes are all `byte`. Handy for fixtures.
    pub const fn repeat(byte: u8) -> Self {
        Identity([byte; 20])
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Identity {
    type Err = SequoiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)?;
        let array: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| {
            SequoiaError::Serialization(format!(
                "identity must be 20 bytes, got {} bytes",
                v.len()
            ))
        })?;
        Ok(Identity(array))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Rarity tier of a position. Tiers are 1-based (`1..=4` in the stock table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RarityClass(pub u8);

impl fmt::Display for RarityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a `0x`-prefixed (or bare) 32-byte hex digest.
pub fn parse_hash32(s: &str) -> Result<Hash32, SequoiaError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        SequoiaError::Serialization(format!("hash must be 32 bytes, got {} bytes", v.len()))
    })
}

/// Format a digest as `0x`-prefixed lowercase hex.
pub fn format_hash32(hash: &Hash32) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Returns the first id that appears more than once, if any.
pub fn first_duplicate(ids: &[PositionId]) -> Option<PositionId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}
