//! Router Info and MPC public key stores
//!
//! Both stores are keyed by a case-insensitive address and keep the first
//! record written for each key. Re-registration is a no-op, never an update.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::normalize::normalize_key;

/// On-chain metadata of a router contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterInfo {
    /// Custodial (MPC) signer authorized to send from this router
    pub mpc: String,
    pub factory: String,
    /// Wrapped native token address
    pub wnative: String,
}

/// Case-insensitive address map where only the first write per key sticks.
struct FirstWriteMap<V> {
    entries: DashMap<String, V>,
}

impl<V: Clone> FirstWriteMap<V> {
    fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn set_if_absent(&self, address: &str, value: V) -> bool {
        if address.is_empty() {
            return false;
        }
        match self.entries.entry(normalize_key(address)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    fn get(&self, address: &str) -> Option<V> {
        self.entries
            .get(&normalize_key(address))
            .map(|v| v.value().clone())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Router contract address → [`RouterInfo`].
pub struct RouterInfoStore {
    infos: FirstWriteMap<Arc<RouterInfo>>,
}

impl Default for RouterInfoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterInfoStore {
    pub fn new() -> Self {
        Self {
            infos: FirstWriteMap::new(),
        }
    }

    /// Store `info` for `router`. Ignored if `router` is empty or already set.
    pub fn set(&self, router: &str, info: RouterInfo) -> bool {
        let inserted = self.infos.set_if_absent(router, Arc::new(info));
        if !inserted {
            tracing::debug!(router = %router, "Router info not stored (empty or already set)");
        }
        inserted
    }

    pub fn get(&self, router: &str) -> Option<Arc<RouterInfo>> {
        self.infos.get(router)
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// MPC signer address → public key.
pub struct MpcPublicKeyStore {
    keys: FirstWriteMap<String>,
}

impl Default for MpcPublicKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MpcPublicKeyStore {
    pub fn new() -> Self {
        Self {
            keys: FirstWriteMap::new(),
        }
    }

    pub fn set(&self, mpc: &str, public_key: &str) -> bool {
        let inserted = self.keys.set_if_absent(mpc, public_key.to_string());
        if !inserted {
            tracing::debug!(mpc = %mpc, "MPC public key not stored (empty or already set)");
        }
        inserted
    }

    pub fn get(&self, mpc: &str) -> Option<String> {
        self.keys.get(mpc)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(mpc: &str) -> RouterInfo {
        RouterInfo {
            mpc: mpc.to_string(),
            factory: "0xFactory".to_string(),
            wnative: "0xWETH".to_string(),
        }
    }

    #[test]
    fn test_router_info_set_and_get() {
        let store = RouterInfoStore::new();
        assert!(store.get("0xRouter").is_none());
        assert!(store.set("0xRouter", info("0xSigner")));
        assert_eq!(store.get("0xRouter").unwrap().mpc, "0xSigner");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_router_info_case_insensitive() {
        let store = RouterInfoStore::new();
        store.set("0xABCDEF", info("0xSigner"));
        assert_eq!(store.get("0xabcdef").unwrap().mpc, "0xSigner");
        assert_eq!(store.get("0xAbCdEf").unwrap().mpc, "0xSigner");
    }

    #[test]
    fn test_router_info_first_write_wins() {
        let store = RouterInfoStore::new();
        assert!(store.set("0xRouter", info("0xFirst")));
        assert!(!store.set("0xROUTER", info("0xSecond")));
        assert_eq!(store.get("0xrouter").unwrap().mpc, "0xFirst");
    }

    #[test]
    fn test_router_info_empty_address_ignored() {
        let store = RouterInfoStore::new();
        assert!(!store.set("", info("0xSigner")));
        assert!(store.is_empty());
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_mpc_public_key_case_insensitive() {
        let store = MpcPublicKeyStore::new();
        assert!(store.set("0xABC", "0x04pubkey"));
        assert_eq!(store.get("0xabc"), Some("0x04pubkey".to_string()));
    }

    #[test]
    fn test_mpc_public_key_first_write_wins() {
        let store = MpcPublicKeyStore::new();
        store.set("0xabc", "first");
        assert!(!store.set("0xABC", "second"));
        assert_eq!(store.get("0xAbc"), Some("first".to_string()));
        assert_eq!(store.len(), 1);
        assert!(store.get("0xdef").is_none());
    }
}
