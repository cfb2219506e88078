//! Swap Policy Evaluator
//!
//! Classifies a pending swap before it is signed:
//!
//! - **Blacklisted** if any of from chain, to chain, token ID, sender, bind
//!   address or tx target is blacklisted.
//! - **Big value** if an ERC20 swap's value is above the token's threshold and
//!   neither the sender nor the tx target is whitelisted.
//! - **Permitted** otherwise.
//!
//! Tokens without a bridge or token config on the source chain cannot be
//! value-gated and are treated as not big (fail-open). Each fail-open is
//! logged and counted in `router_registry_big_value_fail_open_total`.

use alloy_primitives::U256;
use std::fmt;
use std::sync::Arc;

use crate::metrics;
use crate::policy::SwapPolicy;
use crate::registry::RouterRegistry;
use crate::types::ChainId;

/// Kind of asset moved by a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapType {
    /// Native chain coin transfer
    Native,
    /// Contract token transfer
    Erc20,
}

/// Facts about a source-chain swap transaction.
#[derive(Debug, Clone)]
pub struct SwapTxInfo {
    pub swap_type: SwapType,
    pub from_chain_id: ChainId,
    pub to_chain_id: ChainId,
    /// Logical token ID
    pub token_id: String,
    /// Token contract on the source chain
    pub token: String,
    pub from: String,
    /// Recipient on the destination chain
    pub bind: String,
    /// Target of the source transaction
    pub tx_to: String,
    pub value: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapVerdict {
    Permitted,
    BigValue,
    Blacklisted,
}

impl SwapVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapVerdict::Permitted => "permitted",
            SwapVerdict::BigValue => "big_value",
            SwapVerdict::Blacklisted => "blacklisted",
        }
    }
}

impl fmt::Display for SwapVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct SwapPolicyEvaluator<P> {
    registry: Arc<RouterRegistry>,
    policy: P,
}

impl<P: SwapPolicy> SwapPolicyEvaluator<P> {
    pub fn new(registry: Arc<RouterRegistry>, policy: P) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &RouterRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Blacklisted takes precedence over big value.
    pub fn classify(&self, swap: &SwapTxInfo) -> SwapVerdict {
        if self.is_blacklist_swap(swap) {
            SwapVerdict::Blacklisted
        } else if self.is_big_value_swap(swap) {
            SwapVerdict::BigValue
        } else {
            SwapVerdict::Permitted
        }
    }

    pub fn is_big_value_swap(&self, swap: &SwapTxInfo) -> bool {
        if swap.swap_type != SwapType::Erc20 {
            return false;
        }

        let token_id = swap.token_id.as_str();
        if self.policy.is_in_big_value_whitelist(token_id, &swap.from)
            || self.policy.is_in_big_value_whitelist(token_id, &swap.tx_to)
        {
            return false;
        }

        let from_chain_id = swap.from_chain_id.canonical();
        let Some(bridge) = self.registry.bridge(&from_chain_id) else {
            fail_open(swap, &from_chain_id, "no_bridge");
            return false;
        };
        let Some(token_config) = bridge.token_config(&swap.token) else {
            fail_open(swap, &from_chain_id, "no_token_config");
            return false;
        };

        let threshold = self.policy.big_value_threshold(
            token_id,
            &from_chain_id,
            &swap.to_chain_id.canonical(),
            token_config.decimals,
        );
        swap.value > threshold
    }

    pub fn is_blacklist_swap(&self, swap: &SwapTxInfo) -> bool {
        self.policy
            .is_chain_blacklisted(&swap.from_chain_id.canonical())
            || self
                .policy
                .is_chain_blacklisted(&swap.to_chain_id.canonical())
            || self.policy.is_token_blacklisted(&swap.token_id)
            || self.policy.is_account_blacklisted(&swap.from)
            || self.policy.is_account_blacklisted(&swap.bind)
            || self.policy.is_account_blacklisted(&swap.tx_to)
    }
}

fn fail_open(swap: &SwapTxInfo, from_chain_id: &str, reason: &str) {
    tracing::warn!(
        token_id = %swap.token_id,
        token = %swap.token,
        from_chain_id = %from_chain_id,
        value = %swap.value,
        reason,
        "Big value check skipped, token is not configured on source chain"
    );
    metrics::BIG_VALUE_FAIL_OPEN
        .with_label_values(&[from_chain_id, reason])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{StaticBridge, TokenConfig};
    use crate::policy::{PolicyConfig, StaticPolicy};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> Arc<RouterRegistry> {
        let registry = RouterRegistry::new(false);
        let bridge = StaticBridge::new(ChainId::from_u64(1), None).with_token(
            TokenConfig {
                token_id: "USDT".to_string(),
                contract_address: "0xToken".to_string(),
                decimals: 6,
            },
            Some("0xRouter".to_string()),
        );
        registry.register_bridge(&ChainId::from_u64(1), Arc::new(bridge));
        Arc::new(registry)
    }

    fn policy(json: &str) -> StaticPolicy {
        let config: PolicyConfig = serde_json::from_str(json).unwrap();
        StaticPolicy::from_config(&config)
    }

    fn swap(value: u64) -> SwapTxInfo {
        SwapTxInfo {
            swap_type: SwapType::Erc20,
            from_chain_id: ChainId::from_u64(1),
            to_chain_id: ChainId::from_u64(56),
            token_id: "USDT".to_string(),
            token: "0xTOKEN".to_string(),
            from: "0xSender".to_string(),
            bind: "0xReceiver".to_string(),
            tx_to: "0xRouter".to_string(),
            value: U256::from(value),
        }
    }

    // 1000 USDT at 6 decimals
    const THRESHOLD: &str = r#"{ "big_value_thresholds": { "usdt": { "default": 1000 } } }"#;

    #[test]
    fn test_big_value_strictly_above_threshold() {
        let evaluator = SwapPolicyEvaluator::new(registry(), policy(THRESHOLD));
        assert!(!evaluator.is_big_value_swap(&swap(1_000_000_000)));
        assert!(evaluator.is_big_value_swap(&swap(1_000_000_001)));
        assert!(!evaluator.is_big_value_swap(&swap(1)));
    }

    #[test]
    fn test_big_value_ignores_native_swaps() {
        let evaluator = SwapPolicyEvaluator::new(registry(), policy(THRESHOLD));
        let mut native = swap(u64::MAX);
        native.swap_type = SwapType::Native;
        assert!(!evaluator.is_big_value_swap(&native));
    }

    #[test]
    fn test_big_value_whitelist_sender_or_target() {
        let evaluator = SwapPolicyEvaluator::new(
            registry(),
            policy(
                r#"{
                    "big_value_whitelist": { "USDT": ["0xsender"] },
                    "big_value_thresholds": { "usdt": { "default": 1 } }
                }"#,
            ),
        );
        assert!(!evaluator.is_big_value_swap(&swap(u64::MAX)));

        let mut other = swap(u64::MAX);
        other.from = "0xSomeoneElse".to_string();
        assert!(evaluator.is_big_value_swap(&other));

        other.tx_to = "0xSENDER".to_string();
        assert!(!evaluator.is_big_value_swap(&other));
    }

    #[test]
    fn test_big_value_fail_open_without_token_config() {
        let evaluator = SwapPolicyEvaluator::new(registry(), policy(THRESHOLD));
        let counter = metrics::BIG_VALUE_FAIL_OPEN.with_label_values(&["1", "no_token_config"]);
        let before = counter.get();

        let mut unknown = swap(u64::MAX);
        unknown.token = "0xUnknown".to_string();
        assert!(!evaluator.is_big_value_swap(&unknown));
        assert!(counter.get() > before);
    }

    #[test]
    fn test_big_value_fail_open_without_bridge() {
        let evaluator = SwapPolicyEvaluator::new(registry(), policy(THRESHOLD));
        let mut unrouted = swap(u64::MAX);
        unrouted.from_chain_id = ChainId::from_u64(250);
        assert!(!evaluator.is_big_value_swap(&unrouted));
    }

    #[test]
    fn test_blacklist_each_field() {
        let cases = [
            r#"{ "chain_blacklist": ["1"] }"#,
            r#"{ "chain_blacklist": ["56"] }"#,
            r#"{ "token_blacklist": ["usdt"] }"#,
            r#"{ "account_blacklist": ["0xsender"] }"#,
            r#"{ "account_blacklist": ["0xRECEIVER"] }"#,
            r#"{ "account_blacklist": ["0xrouter"] }"#,
        ];
        for json in cases {
            let evaluator = SwapPolicyEvaluator::new(registry(), policy(json));
            assert!(evaluator.is_blacklist_swap(&swap(1)), "case {}", json);
            assert_eq!(evaluator.classify(&swap(1)), SwapVerdict::Blacklisted);
        }
    }

    #[test]
    fn test_blacklist_clean_swap() {
        let evaluator = SwapPolicyEvaluator::new(
            registry(),
            policy(r#"{ "chain_blacklist": ["10"], "account_blacklist": ["0xother"] }"#),
        );
        assert!(!evaluator.is_blacklist_swap(&swap(1)));
        assert_eq!(evaluator.classify(&swap(1)), SwapVerdict::Permitted);
    }

    #[test]
    fn test_classify_big_value() {
        let evaluator = SwapPolicyEvaluator::new(registry(), policy(THRESHOLD));
        assert_eq!(
            evaluator.classify(&swap(2_000_000_000)),
            SwapVerdict::BigValue
        );
        assert_eq!(SwapVerdict::BigValue.to_string(), "big_value");
    }

    /// Counts how many blacklist lookups were made.
    struct CountingPolicy {
        calls: AtomicUsize,
        blacklisted_chain: &'static str,
    }

    impl SwapPolicy for CountingPolicy {
        fn is_in_big_value_whitelist(&self, _: &str, _: &str) -> bool {
            false
        }
        fn is_chain_blacklisted(&self, chain_id: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            chain_id == self.blacklisted_chain
        }
        fn is_token_blacklisted(&self, _: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            false
        }
        fn is_account_blacklisted(&self, _: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            false
        }
        fn big_value_threshold(&self, _: &str, _: &str, _: &str, _: u8) -> U256 {
            U256::MAX
        }
    }

    #[test]
    fn test_blacklist_short_circuits() {
        let evaluator = SwapPolicyEvaluator::new(
            registry(),
            CountingPolicy {
                calls: AtomicUsize::new(0),
                blacklisted_chain: "1",
            },
        );
        assert!(evaluator.is_blacklist_swap(&swap(1)));
        assert_eq!(evaluator.policy().calls.load(Ordering::SeqCst), 1);

        let evaluator = SwapPolicyEvaluator::new(
            registry(),
            CountingPolicy {
                calls: AtomicUsize::new(0),
                blacklisted_chain: "none",
            },
        );
        assert!(!evaluator.is_blacklist_swap(&swap(1)));
        assert_eq!(evaluator.policy().calls.load(Ordering::SeqCst), 6);
    }
}
