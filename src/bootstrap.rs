//! Startup population of the router registry
//!
//! Builds a fresh [`RouterRegistry`] and [`StaticPolicy`] from configuration.
//! Nothing is persisted; a restart runs this again from scratch.

use eyre::{Result, WrapErr};
use std::sync::Arc;

use crate::bridge::{Bridge, StaticBridge, TokenConfig};
use crate::config::{BootstrapFile, ChainEntry, Config};
use crate::policy::StaticPolicy;
use crate::registry::RouterRegistry;
use crate::router_info::RouterInfo;
use crate::types::ChainId;

/// Registry and policy ready to serve lookups.
pub struct Bootstrapped {
    pub registry: Arc<RouterRegistry>,
    pub policy: StaticPolicy,
}

/// Read the bootstrap file named in `config` and build the registry.
pub fn load(config: &Config) -> Result<Bootstrapped> {
    let file = BootstrapFile::from_path(&config.bootstrap_path)?;
    bootstrap(config, &file)
}

/// Build a registry from an already parsed bootstrap file.
pub fn bootstrap(config: &Config, file: &BootstrapFile) -> Result<Bootstrapped> {
    file.validate()?;

    let registry = RouterRegistry::new(config.identity_inferred_routing);
    registry.set_initing(true);

    let mut chain_ids = Vec::with_capacity(file.chains.len());
    for entry in &file.chains {
        let bridge = static_bridge(entry)?;
        let chain_id = bridge.chain_id().clone();
        if registry.register_bridge(&chain_id, Arc::new(bridge)) {
            chain_ids.push(chain_id);
        }
    }
    registry.set_all_chain_ids(chain_ids);

    for router in &file.routers {
        registry.set_router_info(
            &router.address,
            RouterInfo {
                mpc: router.mpc.clone(),
                factory: router.factory.clone(),
                wnative: router.wnative.clone(),
            },
        );
    }

    for (mpc, public_key) in &file.mpc_public_keys {
        registry.set_mpc_public_key(mpc, public_key);
    }

    registry.reload_multichain_tokens(file.multichain_tokens.clone());

    let skipped = registry.add_paused_chain_ids(&config.paused_chain_ids);
    if skipped > 0 {
        tracing::warn!(skipped, "Ignored invalid paused chain IDs from config");
    }

    registry.set_initing(false);

    tracing::info!(
        chains = registry.bridges().len(),
        routers = registry.router_infos().len(),
        mpc_public_keys = registry.mpc_public_keys().len(),
        tokens = registry.multichain_tokens().len(),
        paused = registry.paused_chains().len(),
        identity_inferred_routing = config.identity_inferred_routing,
        "Router registry initialized"
    );

    Ok(Bootstrapped {
        registry: Arc::new(registry),
        policy: StaticPolicy::from_config(&file.policy),
    })
}

fn static_bridge(entry: &ChainEntry) -> Result<StaticBridge> {
    let chain_id = ChainId::parse(&entry.chain_id)
        .wrap_err_with(|| format!("Invalid chain_id '{}'", entry.chain_id))?;

    let bridge = entry.tokens.iter().fold(
        StaticBridge::new(chain_id, entry.router_contract.clone()),
        |bridge, token| {
            bridge.with_token(
                TokenConfig {
                    token_id: token.token_id.clone(),
                    contract_address: token.address.clone(),
                    decimals: token.decimals,
                },
                token.router_contract.clone(),
            )
        },
    );
    Ok(bridge)
}
