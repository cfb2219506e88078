//! Prometheus metrics for the router registry
//!
//! Registered on the default registry so the host process exposes them on its
//! own /metrics endpoint.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

lazy_static! {
    // Resolution pipeline
    pub static ref ROUTE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "router_registry_route_failures_total",
        "Router resolution failures by error kind",
        &["kind"]
    ).unwrap();

    // Swap policy
    pub static ref BIG_VALUE_FAIL_OPEN: IntCounterVec = register_int_counter_vec!(
        "router_registry_big_value_fail_open_total",
        "Big-value checks skipped because the source chain has no bridge or token config",
        &["chain", "reason"]
    ).unwrap();

    // Admin pause commands
    pub static ref PAUSE_ENTRIES_SKIPPED: IntCounterVec = register_int_counter_vec!(
        "router_registry_pause_entries_skipped_total",
        "Malformed chain IDs dropped from pause/unpause batches",
        &["op"]
    ).unwrap();

    pub static ref PAUSED_CHAINS: IntGauge = register_int_gauge!(
        "router_registry_paused_chains",
        "Number of chain IDs currently paused"
    ).unwrap();
}

/// Render the default registry in Prometheus text format.
pub fn encode_text() -> eyre::Result<String> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
