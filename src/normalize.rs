//! Identifier normalization
//!
//! Addresses and token IDs are compared case-insensitively. Chain IDs are not
//! normalized here; see [`crate::types::ChainId`].

/// Lower-case an address or token ID for use as a map key.
pub fn normalize_key(id: &str) -> String {
    id.to_lowercase()
}
