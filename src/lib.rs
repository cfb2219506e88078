//! Router-Registry: Router Lookups and Swap Policy for the Cross-Chain Router
//!
//! This crate is the lookup authority every signer, broadcaster and monitor
//! of the router depends on:
//!
//! - **Bridge Registry** - One bridge handle per supported chain
//! - **Router Info Store** - Router contract → MPC signer, factory, wrapped native
//! - **Multichain Token Index** - Token ID + chain → token contract address
//! - **Resolution Pipeline** - Token ID + destination chain → router MPC
//! - **Chain-Pause Set** - Chains disabled by admin command
//! - **Swap Policy Evaluator** - Blacklist and big-value classification of swaps
//!
//! ## Usage
//!
//! ```ignore
//! use router_registry::{bootstrap, Config, SwapPolicyEvaluator};
//!
//! let config = Config::load()?;
//! let bootstrap::Bootstrapped { registry, policy } = bootstrap::load(&config)?;
//!
//! let mpc = registry.get_router_mpc("USDT", "56")?;
//! let evaluator = SwapPolicyEvaluator::new(registry.clone(), policy);
//! ```
//!
//! All lookups are in-memory and non-blocking. The registry is rebuilt from
//! configuration on every start.

pub mod bootstrap;
pub mod bridge;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod normalize;
pub mod paused;
pub mod policy;
pub mod registry;
pub mod router_info;
pub mod tokens;
pub mod types;

// Re-export commonly used items at the crate root
pub use bridge::{Bridge, BridgeRegistry, StaticBridge, TokenConfig};
pub use config::{BootstrapFile, Config};
pub use error::{Result, RouterError};
pub use evaluator::{SwapPolicyEvaluator, SwapTxInfo, SwapType, SwapVerdict};
pub use normalize::normalize_key;
pub use paused::PausedChainSet;
pub use policy::{PolicyConfig, StaticPolicy, SwapPolicy};
pub use registry::RouterRegistry;
pub use router_info::{MpcPublicKeyStore, RouterInfo, RouterInfoStore};
pub use tokens::{MultichainTokenEntry, MultichainTokenIndex, MultichainTokenTable};
pub use types::ChainId;
