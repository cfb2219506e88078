//! Error types for router resolution
//!
//! Every variant describes missing or malformed configuration. None of them is
//! fatal to the process; callers log and skip the affected swap until the next
//! configuration refresh.

use thiserror::Error;

/// Result alias for registry operations.
pub type Result<T, E = RouterError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No bridge is registered for the chain; the chain is currently unroutable.
    #[error("No bridge registered for chain {chain_id}")]
    NoBridgeForChain { chain_id: String },

    /// The token identity has no known contract address on the chain.
    #[error("Missing multichain token config: token {token_id} on chain {chain_id}")]
    MissingTokenConfig { token_id: String, chain_id: String },

    /// The bridge returned no router contract, or the router has no signer record.
    /// `router` is empty when the bridge itself had no router for the token.
    #[error("Missing router info: token {token_id} on chain {chain_id} (router '{router}')")]
    MissingRouterInfo {
        token_id: String,
        chain_id: String,
        router: String,
    },

    #[error("Invalid chain ID: '{value}'")]
    InvalidChainId { value: String },
}

impl RouterError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::NoBridgeForChain { .. } => "no_bridge_for_chain",
            RouterError::MissingTokenConfig { .. } => "missing_token_config",
            RouterError::MissingRouterInfo { .. } => "missing_router_info",
            RouterError::InvalidChainId { .. } => "invalid_chain_id",
        }
    }
}
