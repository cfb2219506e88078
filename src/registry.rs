//! Router Registry
//!
//! Owns every lookup table of the router: bridges, router infos, MPC public
//! keys, multichain tokens and paused chains. One registry is built at startup
//! and shared as `Arc<RouterRegistry>` with every worker; dropping it is the
//! shutdown boundary.
//!
//! ## Resolution pipeline
//!
//! ```text
//! (tokenID, chainID) -> bridge -> multichain token -> router contract -> router info -> MPC
//! ```
//!
//! Each stage that comes up empty yields its own [`RouterError`]. Nothing is
//! retried here; missing config is picked up by the next configuration refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::bridge::{Bridge, BridgeRegistry};
use crate::error::{Result, RouterError};
use crate::metrics;
use crate::paused::PausedChainSet;
use crate::router_info::{MpcPublicKeyStore, RouterInfo, RouterInfoStore};
use crate::tokens::{MultichainTokenIndex, MultichainTokenTable};
use crate::types::ChainId;

pub struct RouterRegistry {
    bridges: BridgeRegistry,
    router_infos: RouterInfoStore,
    mpc_public_keys: MpcPublicKeyStore,
    multichain_tokens: MultichainTokenIndex,
    paused_chains: PausedChainSet,
    /// Cross-chain identity comes from the messaging layer; skip token lookups.
    identity_inferred_routing: bool,
    all_chain_ids: OnceLock<Vec<ChainId>>,
    all_token_ids: RwLock<Vec<String>>,
    initing: AtomicBool,
}

impl Default for RouterRegistry {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RouterRegistry {
    pub fn new(identity_inferred_routing: bool) -> Self {
        Self {
            bridges: BridgeRegistry::new(),
            router_infos: RouterInfoStore::new(),
            mpc_public_keys: MpcPublicKeyStore::new(),
            multichain_tokens: MultichainTokenIndex::new(),
            paused_chains: PausedChainSet::new(),
            identity_inferred_routing,
            all_chain_ids: OnceLock::new(),
            all_token_ids: RwLock::new(Vec::new()),
            initing: AtomicBool::new(false),
        }
    }

    pub fn uses_identity_inferred_routing(&self) -> bool {
        self.identity_inferred_routing
    }

    // ------------------------------------------------------------------------
    // Bridges
    // ------------------------------------------------------------------------

    pub fn register_bridge(&self, chain_id: &ChainId, bridge: Arc<dyn Bridge>) -> bool {
        self.bridges.register(chain_id, bridge)
    }

    pub fn bridge(&self, chain_id: &str) -> Option<Arc<dyn Bridge>> {
        self.bridges.get(chain_id)
    }

    pub fn bridges(&self) -> &BridgeRegistry {
        &self.bridges
    }

    // ------------------------------------------------------------------------
    // Router infos and MPC keys
    // ------------------------------------------------------------------------

    pub fn set_router_info(&self, router: &str, info: RouterInfo) -> bool {
        self.router_infos.set(router, info)
    }

    pub fn router_info(&self, router: &str) -> Option<Arc<RouterInfo>> {
        self.router_infos.get(router)
    }

    pub fn router_infos(&self) -> &RouterInfoStore {
        &self.router_infos
    }

    pub fn set_mpc_public_key(&self, mpc: &str, public_key: &str) -> bool {
        self.mpc_public_keys.set(mpc, public_key)
    }

    pub fn get_mpc_public_key(&self, mpc: &str) -> Option<String> {
        self.mpc_public_keys.get(mpc)
    }

    pub fn mpc_public_keys(&self) -> &MpcPublicKeyStore {
        &self.mpc_public_keys
    }

    // ------------------------------------------------------------------------
    // Multichain tokens
    // ------------------------------------------------------------------------

    pub fn multichain_tokens(&self) -> &MultichainTokenIndex {
        &self.multichain_tokens
    }

    pub fn get_multichain_token(&self, token_id: &str, chain_id: &str) -> Option<String> {
        self.multichain_tokens.get(token_id, chain_id)
    }

    /// Swap in a freshly loaded multichain token table and refresh the token ID list.
    ///
    /// Concurrent reloads are serialized on the token ID list lock, so the list
    /// always describes the table that was swapped in last.
    pub fn reload_multichain_tokens(&self, table: MultichainTokenTable) {
        let mut all_token_ids = self
            .all_token_ids
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.multichain_tokens.replace_all(table);
        *all_token_ids = self.multichain_tokens.token_ids();
        tracing::info!(
            token_count = all_token_ids.len(),
            "Reloaded multichain tokens"
        );
    }

    // ------------------------------------------------------------------------
    // Chain and token ID lists
    // ------------------------------------------------------------------------

    /// Record every supported chain ID. Only the first call has any effect.
    pub fn set_all_chain_ids(&self, mut chain_ids: Vec<ChainId>) -> bool {
        chain_ids.sort();
        chain_ids.dedup();
        self.all_chain_ids.set(chain_ids).is_ok()
    }

    pub fn all_chain_ids(&self) -> &[ChainId] {
        self.all_chain_ids.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_token_ids(&self) -> Vec<String> {
        self.all_token_ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ------------------------------------------------------------------------
    // Init flag
    // ------------------------------------------------------------------------

    pub fn set_initing(&self, initing: bool) {
        self.initing.store(initing, Ordering::SeqCst);
    }

    pub fn is_initing(&self) -> bool {
        self.initing.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------------
    // Paused chains
    // ------------------------------------------------------------------------

    pub fn paused_chains(&self) -> &PausedChainSet {
        &self.paused_chains
    }

    pub fn add_paused_chain_ids<S: AsRef<str>>(&self, chain_ids: &[S]) -> usize {
        self.paused_chains.add(chain_ids)
    }

    pub fn remove_paused_chain_ids<S: AsRef<str>>(&self, chain_ids: &[S]) -> usize {
        self.paused_chains.remove(chain_ids)
    }

    pub fn paused_chain_ids(&self) -> Vec<ChainId> {
        self.paused_chains.list()
    }

    pub fn is_chain_paused(&self, chain_id: &str) -> bool {
        self.paused_chains.is_paused(chain_id)
    }

    // ------------------------------------------------------------------------
    // Resolution pipeline
    // ------------------------------------------------------------------------

    /// Router contract serving `token_id` on `chain_id`.
    pub fn get_token_router_contract(&self, token_id: &str, chain_id: &str) -> Result<String> {
        let bridge = self.bridges.get(chain_id).ok_or_else(|| {
            route_failure(RouterError::NoBridgeForChain {
                chain_id: chain_id.to_string(),
            })
        })?;

        let multichain_token = if self.identity_inferred_routing {
            String::new()
        } else {
            self.multichain_tokens
                .get(token_id, chain_id)
                .ok_or_else(|| {
                    tracing::warn!(
                        token_id = %token_id,
                        chain_id = %chain_id,
                        "Get token router contract: multichain token not found"
                    );
                    route_failure(RouterError::MissingTokenConfig {
                        token_id: token_id.to_string(),
                        chain_id: chain_id.to_string(),
                    })
                })?
        };

        bridge
            .router_contract(&multichain_token)
            .filter(|router| !router.is_empty())
            .ok_or_else(|| {
                route_failure(RouterError::MissingRouterInfo {
                    token_id: token_id.to_string(),
                    chain_id: chain_id.to_string(),
                    router: String::new(),
                })
            })
    }

    /// Router info of the router serving `token_id` on `chain_id`.
    pub fn get_token_router_info(
        &self,
        token_id: &str,
        chain_id: &str,
    ) -> Result<Arc<RouterInfo>> {
        let router = self.get_token_router_contract(token_id, chain_id)?;
        self.router_infos.get(&router).ok_or_else(|| {
            route_failure(RouterError::MissingRouterInfo {
                token_id: token_id.to_string(),
                chain_id: chain_id.to_string(),
                router,
            })
        })
    }

    /// MPC signer of the router on the destination chain (used to build swap-in txs).
    pub fn get_router_mpc(&self, token_id: &str, chain_id: &str) -> Result<String> {
        let info = self.get_token_router_info(token_id, chain_id)?;
        Ok(info.mpc.clone())
    }
}

fn route_failure(err: RouterError) -> RouterError {
    metrics::ROUTE_FAILURES
        .with_label_values(&[err.kind()])
        .inc();
    err
}
