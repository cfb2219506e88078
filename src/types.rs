//! Common types for router lookups
//!
//! [`ChainId`] keeps both the numeric value of a chain identifier and the exact
//! text it was parsed from. Ordering and equality use the value; string-keyed
//! stores use either the exact text ([`ChainId::as_key`]) or the canonical
//! decimal form ([`ChainId::canonical`]).

use alloy_primitives::U256;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Result, RouterError};

// ============================================================================
// Chain ID
// ============================================================================

/// Non-negative chain identifier (decimal or `0x`-prefixed hex).
#[derive(Debug, Clone)]
pub struct ChainId {
    value: U256,
    key: String,
}

impl ChainId {
    /// Parse a chain ID, rejecting empty, negative and non-numeric input.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || RouterError::InvalidChainId {
            value: s.to_string(),
        };

        let digits = match s.get(..2) {
            Some(prefix) if matches!(prefix, "0x" | "0X" | "0o" | "0O" | "0b" | "0B") => &s[2..],
            _ => s,
        };
        // Underscores are digit separators only
        if digits.is_empty()
            || digits.starts_with('_')
            || digits.ends_with('_')
            || digits.contains("__")
        {
            return Err(invalid());
        }

        let value = U256::from_str(s).map_err(|_| invalid())?;
        Ok(Self {
            value,
            key: s.to_string(),
        })
    }

    /// Create from u64; the key is its decimal form
    pub fn from_u64(id: u64) -> Self {
        Self {
            value: U256::from(id),
            key: id.to_string(),
        }
    }

    /// Numeric value
    pub fn value(&self) -> U256 {
        self.value
    }

    /// The exact text this chain ID was created from.
    pub fn as_key(&self) -> &str {
        &self.key
    }

    /// Canonical decimal form (e.g. "0x38" becomes "56")
    pub fn canonical(&self) -> String {
        self.value.to_string()
    }
}

impl PartialEq for ChainId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ChainId {}

impl Hash for ChainId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for ChainId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChainId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for ChainId {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        ChainId::parse(s)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId::from_u64(id)
    }
}
