//! Router registry configuration
//!
//! Process settings come from the environment (a `.env` file is loaded first
//! when present). Chain, router and token tables come from the JSON bootstrap
//! file named by `ROUTER_CONFIG_PATH`.

use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::policy::PolicyConfig;
use crate::tokens::MultichainTokenTable;
use crate::types::ChainId;

/// Process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON bootstrap file
    pub bootstrap_path: PathBuf,
    /// Route by messaging-layer identity instead of multichain token addresses
    pub identity_inferred_routing: bool,
    /// Chains paused at startup
    pub paused_chain_ids: Vec<String>,
    /// RPC retries allowed while the registry is initializing
    pub init_retry_count: u32,
    pub init_retry_interval_ms: u64,
}

fn default_init_retry_count() -> u32 {
    10
}

fn default_init_retry_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment variables
    /// Loads .env file if present, then reads from environment
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env")
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
            tracing::debug!(path, "Loaded .env file");
        }
        Self::load_from_env()
    }

    fn load_from_env() -> Result<Self> {
        let config = Config {
            bootstrap_path: env::var("ROUTER_CONFIG_PATH")
                .map_err(|_| eyre!("ROUTER_CONFIG_PATH environment variable is required"))?
                .into(),
            identity_inferred_routing: env::var("ROUTER_IDENTITY_INFERRED_ROUTING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            paused_chain_ids: env::var("ROUTER_PAUSED_CHAIN_IDS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            init_retry_count: env::var("ROUTER_INIT_RETRY_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_init_retry_count()),
            init_retry_interval_ms: env::var("ROUTER_INIT_RETRY_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_init_retry_interval_ms()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn init_retry_interval(&self) -> Duration {
        Duration::from_millis(self.init_retry_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.bootstrap_path.as_os_str().is_empty() {
            return Err(eyre!("ROUTER_CONFIG_PATH cannot be empty"));
        }
        if self.init_retry_count == 0 {
            return Err(eyre!("ROUTER_INIT_RETRY_COUNT must be at least 1"));
        }
        Ok(())
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empty items.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Bootstrap file
// ============================================================================

/// Token known to a chain's bridge
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub address: String,
    pub token_id: String,
    pub decimals: u8,
    /// Router serving this token; falls back to the chain router
    #[serde(default)]
    pub router_contract: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    pub chain_id: String,
    /// Chain-wide router contract
    #[serde(default)]
    pub router_contract: Option<String>,
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterEntry {
    pub address: String,
    pub mpc: String,
    #[serde(default)]
    pub factory: String,
    #[serde(default)]
    pub wnative: String,
}

/// Contents of the JSON bootstrap file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BootstrapFile {
    pub chains: Vec<ChainEntry>,
    pub routers: Vec<RouterEntry>,
    /// MPC address → public key
    pub mpc_public_keys: HashMap<String, String>,
    pub multichain_tokens: MultichainTokenTable,
    pub policy: PolicyConfig,
}

impl BootstrapFile {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: BootstrapFile =
            serde_json::from_str(json).wrap_err("Failed to parse bootstrap config")?;
        file.validate()?;
        Ok(file)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read bootstrap config {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Check chain IDs and required fields.
    ///
    /// Bridges are looked up by canonical decimal chain ID, so multichain token
    /// chain keys must already be in that form.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for chain in &self.chains {
            let chain_id = ChainId::parse(&chain.chain_id)
                .wrap_err_with(|| format!("chains: invalid chain_id '{}'", chain.chain_id))?;
            if !seen.insert(chain_id.clone()) {
                return Err(eyre!("chains: duplicate chain_id {}", chain_id));
            }
            for token in &chain.tokens {
                if token.address.is_empty() {
                    return Err(eyre!(
                        "chains[{}]: token {} has an empty address",
                        chain.chain_id,
                        token.token_id
                    ));
                }
            }
        }

        for (token_id, chains) in &self.multichain_tokens {
            for key in chains.keys() {
                let chain_id = ChainId::parse(key).wrap_err_with(|| {
                    format!("multichain_tokens[{}]: invalid chain_id '{}'", token_id, key)
                })?;
                if chain_id.canonical() != *key {
                    return Err(eyre!(
                        "multichain_tokens[{}]: chain_id '{}' must be written as {}",
                        token_id,
                        key,
                        chain_id
                    ));
                }
            }
        }

        for router in &self.routers {
            if router.address.is_empty() {
                return Err(eyre!("routers: router address cannot be empty"));
            }
            if router.mpc.is_empty() {
                return Err(eyre!("routers[{}]: mpc cannot be empty", router.address));
            }
        }

        Ok(())
    }
}
