//! Swap policy providers
//!
//! Blacklists, the big-value whitelist and big-value thresholds are owned by
//! the host's parameter layer. [`SwapPolicy`] is the seam the evaluator talks
//! to; [`StaticPolicy`] implements it from the bootstrap config.

use alloy_primitives::U256;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::normalize::normalize_key;
use crate::types::ChainId;

/// Policy lookups consumed by the swap evaluator.
pub trait SwapPolicy: Send + Sync {
    fn is_in_big_value_whitelist(&self, token_id: &str, account: &str) -> bool;

    fn is_chain_blacklisted(&self, chain_id: &str) -> bool;

    fn is_token_blacklisted(&self, token_id: &str) -> bool;

    fn is_account_blacklisted(&self, account: &str) -> bool;

    /// Threshold in the token's smallest unit on the source chain.
    fn big_value_threshold(
        &self,
        token_id: &str,
        from_chain_id: &str,
        to_chain_id: &str,
        decimals: u8,
    ) -> U256;
}

impl<P: SwapPolicy + ?Sized> SwapPolicy for Arc<P> {
    fn is_in_big_value_whitelist(&self, token_id: &str, account: &str) -> bool {
        (**self).is_in_big_value_whitelist(token_id, account)
    }

    fn is_chain_blacklisted(&self, chain_id: &str) -> bool {
        (**self).is_chain_blacklisted(chain_id)
    }

    fn is_token_blacklisted(&self, token_id: &str) -> bool {
        (**self).is_token_blacklisted(token_id)
    }

    fn is_account_blacklisted(&self, account: &str) -> bool {
        (**self).is_account_blacklisted(account)
    }

    fn big_value_threshold(
        &self,
        token_id: &str,
        from_chain_id: &str,
        to_chain_id: &str,
        decimals: u8,
    ) -> U256 {
        (**self).big_value_threshold(token_id, from_chain_id, to_chain_id, decimals)
    }
}

// ============================================================================
// Config-backed policy
// ============================================================================

/// Big-value threshold of one token, in whole token units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BigValueThresholdConfig {
    pub default: u64,
    /// Overrides keyed by `"<fromChainID>:<toChainID>"`
    #[serde(default)]
    pub routes: HashMap<String, u64>,
}

/// Policy section of the bootstrap file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub chain_blacklist: Vec<String>,
    pub token_blacklist: Vec<String>,
    pub account_blacklist: Vec<String>,
    /// tokenID → accounts exempt from big-value gating
    pub big_value_whitelist: HashMap<String, Vec<String>>,
    /// tokenID → threshold
    pub big_value_thresholds: HashMap<String, BigValueThresholdConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    chain_blacklist: HashSet<String>,
    token_blacklist: HashSet<String>,
    account_blacklist: HashSet<String>,
    big_value_whitelist: HashMap<String, HashSet<String>>,
    big_value_thresholds: HashMap<String, BigValueThresholdConfig>,
}

impl StaticPolicy {
    /// Build from config. Chain IDs are stored in canonical decimal form;
    /// unparseable ones are dropped with a warning.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let chain_blacklist = config
            .chain_blacklist
            .iter()
            .filter_map(|raw| match ChainId::parse(raw) {
                Ok(chain_id) => Some(chain_id.canonical()),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid blacklisted chain ID");
                    None
                }
            })
            .collect();

        let big_value_whitelist = config
            .big_value_whitelist
            .iter()
            .map(|(token_id, accounts)| (normalize_key(token_id), normalize_all(accounts)))
            .collect();

        let big_value_thresholds = config
            .big_value_thresholds
            .iter()
            .map(|(token_id, threshold)| (normalize_key(token_id), threshold.clone()))
            .collect();

        Self {
            chain_blacklist,
            token_blacklist: normalize_all(&config.token_blacklist),
            account_blacklist: normalize_all(&config.account_blacklist),
            big_value_whitelist,
            big_value_thresholds,
        }
    }

    /// Whole-unit threshold for a token and route, if configured.
    pub fn threshold_units(
        &self,
        token_id: &str,
        from_chain_id: &str,
        to_chain_id: &str,
    ) -> Option<u64> {
        let config = self.big_value_thresholds.get(&normalize_key(token_id))?;
        let route = format!("{}:{}", from_chain_id, to_chain_id);
        Some(config.routes.get(&route).copied().unwrap_or(config.default))
    }
}

fn normalize_all(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| normalize_key(s)).collect()
}

/// `units * 10^decimals`, saturating at `U256::MAX`.
pub fn scale_to_decimals(units: u64, decimals: u8) -> U256 {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .and_then(|scale| U256::from(units).checked_mul(scale))
        .unwrap_or(U256::MAX)
}

impl SwapPolicy for StaticPolicy {
    fn is_in_big_value_whitelist(&self, token_id: &str, account: &str) -> bool {
        if account.is_empty() {
            return false;
        }
        self.big_value_whitelist
            .get(&normalize_key(token_id))
            .is_some_and(|accounts| accounts.contains(&normalize_key(account)))
    }

    fn is_chain_blacklisted(&self, chain_id: &str) -> bool {
        self.chain_blacklist.contains(chain_id)
    }

    fn is_token_blacklisted(&self, token_id: &str) -> bool {
        self.token_blacklist.contains(&normalize_key(token_id))
    }

    fn is_account_blacklisted(&self, account: &str) -> bool {
        !account.is_empty() && self.account_blacklist.contains(&normalize_key(account))
    }

    /// Unconfigured tokens get `U256::MAX`, so they are never big-value.
    fn big_value_threshold(
        &self,
        token_id: &str,
        from_chain_id: &str,
        to_chain_id: &str,
        decimals: u8,
    ) -> U256 {
        match self.threshold_units(token_id, from_chain_id, to_chain_id) {
            Some(units) => scale_to_decimals(units, decimals),
            None => U256::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> StaticPolicy {
        let config: PolicyConfig = serde_json::from_str(
            r#"{
                "chain_blacklist": ["0x38", "bogus"],
                "token_blacklist": ["SCAM"],
                "account_blacklist": ["0xBAD"],
                "big_value_whitelist": { "USDT": ["0xWhale"] },
                "big_value_thresholds": {
                    "USDT": { "default": 1000000, "routes": { "1:56": 500000 } }
                }
            }"#,
        )
        .unwrap();
        StaticPolicy::from_config(&config)
    }

    #[test]
    fn test_chain_blacklist_canonical() {
        let policy = policy();
        assert!(policy.is_chain_blacklisted("56"));
        assert!(!policy.is_chain_blacklisted("1"));
    }

    #[test]
    fn test_token_and_account_blacklist_case_insensitive() {
        let policy = policy();
        assert!(policy.is_token_blacklisted("scam"));
        assert!(policy.is_account_blacklisted("0xbad"));
        assert!(!policy.is_account_blacklisted(""));
        assert!(!policy.is_token_blacklisted("usdt"));
    }

    #[test]
    fn test_big_value_whitelist() {
        let policy = policy();
        assert!(policy.is_in_big_value_whitelist("usdt", "0xWHALE"));
        assert!(!policy.is_in_big_value_whitelist("usdc", "0xwhale"));
        assert!(!policy.is_in_big_value_whitelist("usdt", ""));
    }

    #[test]
    fn test_threshold_default_and_route_override() {
        let policy = policy();
        assert_eq!(
            policy.big_value_threshold("USDT", "1", "10", 6),
            U256::from(1_000_000u64) * U256::from(1_000_000u64)
        );
        assert_eq!(
            policy.big_value_threshold("usdt", "1", "56", 6),
            U256::from(500_000u64) * U256::from(1_000_000u64)
        );
    }

    #[test]
    fn test_threshold_unconfigured_token_is_max() {
        let policy = policy();
        assert_eq!(policy.big_value_threshold("DAI", "1", "56", 18), U256::MAX);
        assert!(policy.threshold_units("DAI", "1", "56").is_none());
    }

    #[test]
    fn test_scale_to_decimals() {
        assert_eq!(scale_to_decimals(5, 0), U256::from(5u64));
        assert_eq!(scale_to_decimals(5, 2), U256::from(500u64));
        assert_eq!(scale_to_decimals(u64::MAX, 255), U256::MAX);
    }

    #[test]
    fn test_policy_through_arc() {
        let shared: Arc<StaticPolicy> = Arc::new(policy());
        assert!(shared.is_token_blacklisted("SCAM"));
    }
}
