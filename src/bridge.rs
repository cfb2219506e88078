//! Bridge Registry
//!
//! Each supported chain is served by exactly one [`Bridge`] handle. The chain
//! specific implementations live outside this crate; [`StaticBridge`] is the
//! config-backed implementation used at bootstrap and in tests.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::normalize::normalize_key;
use crate::types::ChainId;

/// Per-token configuration a bridge knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Logical (cross-chain) token identity
    pub token_id: String,
    /// Token contract address on this chain
    pub contract_address: String,
    /// Token decimals on this chain
    pub decimals: u8,
}

/// Capability interface of a per-chain bridge.
pub trait Bridge: Send + Sync {
    /// The chain this bridge is bound to.
    fn chain_id(&self) -> &ChainId;

    /// Router contract serving `token_address`.
    ///
    /// `token_address` is empty when routing is inferred from the messaging
    /// layer; bridges then return their chain-wide router, if any.
    fn router_contract(&self, token_address: &str) -> Option<String>;

    /// Token configuration for a token contract on this chain.
    fn token_config(&self, token_address: &str) -> Option<TokenConfig>;
}

/// Chain ID → bridge handle. First registration wins.
#[derive(Default)]
pub struct BridgeRegistry {
    bridges: DashMap<String, Arc<dyn Bridge>>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bridge` for `chain_id` under its canonical decimal key.
    ///
    /// Returns false (and keeps the existing bridge) if the chain already has
    /// one, or if the bridge is bound to a different chain.
    pub fn register(&self, chain_id: &ChainId, bridge: Arc<dyn Bridge>) -> bool {
        if bridge.chain_id() != chain_id {
            tracing::warn!(
                chain_id = %chain_id,
                bridge_chain_id = %bridge.chain_id(),
                "Refusing to register bridge bound to another chain"
            );
            return false;
        }

        match self.bridges.entry(chain_id.canonical()) {
            Entry::Occupied(_) => {
                tracing::warn!(chain_id = %chain_id, "Bridge already registered, ignoring");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(bridge);
                tracing::debug!(chain_id = %chain_id, "Bridge registered");
                true
            }
        }
    }

    /// Bridge for a chain key. `None` means the chain has no route.
    pub fn get(&self, chain_id: &str) -> Option<Arc<dyn Bridge>> {
        self.bridges.get(chain_id).map(|b| Arc::clone(b.value()))
    }

    pub fn contains(&self, chain_id: &str) -> bool {
        self.bridges.contains_key(chain_id)
    }

    /// Chain IDs with a registered bridge, ascending.
    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self
            .bridges
            .iter()
            .map(|entry| entry.value().chain_id().clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}

// ============================================================================
// Static (config-backed) bridge
// ============================================================================

#[derive(Debug, Clone)]
struct StaticToken {
    config: TokenConfig,
    router_contract: Option<String>,
}

/// Bridge backed by a fixed token table.
///
/// Tokens without their own router fall back to the chain-wide router.
#[derive(Debug, Clone)]
pub struct StaticBridge {
    chain_id: ChainId,
    router_contract: Option<String>,
    tokens: HashMap<String, StaticToken>,
}

impl StaticBridge {
    pub fn new(chain_id: ChainId, router_contract: Option<String>) -> Self {
        Self {
            chain_id,
            router_contract: router_contract.filter(|r| !r.is_empty()),
            tokens: HashMap::new(),
        }
    }

    /// Add a token, optionally with its own router contract.
    pub fn with_token(mut self, config: TokenConfig, router_contract: Option<String>) -> Self {
        self.tokens.insert(
            normalize_key(&config.contract_address),
            StaticToken {
                config,
                router_contract: router_contract.filter(|r| !r.is_empty()),
            },
        );
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

impl Bridge for StaticBridge {
    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn router_contract(&self, token_address: &str) -> Option<String> {
        if token_address.is_empty() {
            return self.router_contract.clone();
        }
        self.tokens
            .get(&normalize_key(token_address))
            .and_then(|t| t.router_contract.clone())
            .or_else(|| self.router_contract.clone())
    }

    fn token_config(&self, token_address: &str) -> Option<TokenConfig> {
        self.tokens
            .get(&normalize_key(token_address))
            .map(|t| t.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdt_on(chain: u64) -> StaticBridge {
        StaticBridge::new(ChainId::from_u64(chain), Some("0xChainRouter".to_string())).with_token(
            TokenConfig {
                token_id: "USDT".to_string(),
                contract_address: "0xTOKEN".to_string(),
                decimals: 6,
            },
            Some("0xRouter".to_string()),
        )
    }

    #[test]
    fn test_register_and_get() {
        let registry = BridgeRegistry::new();
        assert!(registry.get("1").is_none());

        assert!(registry.register(&ChainId::from_u64(1), Arc::new(usdt_on(1))));
        let bridge = registry.get("1").unwrap();
        assert_eq!(bridge.chain_id().canonical(), "1");
        assert!(registry.contains("1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = BridgeRegistry::new();
        let first = StaticBridge::new(ChainId::from_u64(1), Some("0xFirst".to_string()));
        let second = StaticBridge::new(ChainId::from_u64(1), Some("0xSecond".to_string()));

        assert!(registry.register(&ChainId::from_u64(1), Arc::new(first)));
        assert!(!registry.register(&ChainId::from_u64(1), Arc::new(second)));

        let bridge = registry.get("1").unwrap();
        assert_eq!(bridge.router_contract(""), Some("0xFirst".to_string()));
    }

    #[test]
    fn test_register_uses_canonical_key() {
        let registry = BridgeRegistry::new();
        let chain = ChainId::parse("0x38").unwrap();
        let bridge = StaticBridge::new(chain.clone(), None);
        assert!(registry.register(&chain, Arc::new(bridge)));
        assert!(registry.get("56").is_some());
        assert!(registry.get("0x38").is_none());
    }

    #[test]
    fn test_register_rejects_mismatched_chain() {
        let registry = BridgeRegistry::new();
        assert!(!registry.register(&ChainId::from_u64(2), Arc::new(usdt_on(1))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_chain_ids_sorted() {
        let registry = BridgeRegistry::new();
        for chain in [250u64, 1, 56] {
            registry.register(&ChainId::from_u64(chain), Arc::new(usdt_on(chain)));
        }
        let ids: Vec<String> = registry.chain_ids().iter().map(|c| c.canonical()).collect();
        assert_eq!(ids, vec!["1", "56", "250"]);
    }

    #[test]
    fn test_static_bridge_router_lookup() {
        let bridge = usdt_on(1);
        assert_eq!(bridge.router_contract("0xtoken"), Some("0xRouter".to_string()));
        assert_eq!(bridge.router_contract("0xOTHER"), Some("0xChainRouter".to_string()));
        assert_eq!(bridge.router_contract(""), Some("0xChainRouter".to_string()));

        let bare = StaticBridge::new(ChainId::from_u64(1), Some(String::new()));
        assert_eq!(bare.router_contract(""), None);
    }

    #[test]
    fn test_static_bridge_token_config() {
        let bridge = usdt_on(1);
        let cfg = bridge.token_config("0xToken").unwrap();
        assert_eq!(cfg.decimals, 6);
        assert_eq!(cfg.token_id, "USDT");
        assert!(bridge.token_config("0xother").is_none());
        assert_eq!(bridge.token_count(), 1);
    }
}
