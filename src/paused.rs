//! Chain-Pause Set
//!
//! Chains disabled by admin command. Membership is keyed by the exact string
//! used when pausing: `is_paused("0x38")` does not match a chain paused as
//! `"56"`. Callers must use the same form for both.
//!
//! Every set reports into the process-wide `router_registry_paused_chains`
//! gauge, so the gauge is only meaningful with one registry per process.

use dashmap::DashMap;

use crate::metrics;
use crate::types::ChainId;

#[derive(Default)]
pub struct PausedChainSet {
    chains: DashMap<String, ChainId>,
}

impl PausedChainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause every valid chain ID in `chain_ids`.
    ///
    /// Empty or non-numeric entries are skipped. Returns the number skipped.
    pub fn add<S: AsRef<str>>(&self, chain_ids: &[S]) -> usize {
        let mut skipped = 0;
        for raw in chain_ids {
            match ChainId::parse(raw.as_ref()) {
                Ok(chain_id) => {
                    tracing::info!(chain_id = %raw.as_ref(), "Pausing chain");
                    self.chains.insert(chain_id.as_key().to_string(), chain_id);
                }
                Err(_) => skipped += 1,
            }
        }
        self.record("add", skipped);
        skipped
    }

    /// Unpause every valid chain ID in `chain_ids`. Returns the number skipped.
    pub fn remove<S: AsRef<str>>(&self, chain_ids: &[S]) -> usize {
        let mut skipped = 0;
        for raw in chain_ids {
            let raw = raw.as_ref();
            if ChainId::parse(raw).is_err() {
                skipped += 1;
                continue;
            }
            if self.chains.remove(raw).is_some() {
                tracing::info!(chain_id = %raw, "Unpausing chain");
            }
        }
        self.record("remove", skipped);
        skipped
    }

    /// Paused chain IDs, ascending and deduplicated by value.
    pub fn list(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self.chains.iter().map(|e| e.value().clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Exact string membership.
    pub fn is_paused(&self, chain_id: &str) -> bool {
        self.chains.contains_key(chain_id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    fn record(&self, op: &str, skipped: usize) {
        if skipped > 0 {
            tracing::debug!(op, skipped, "Dropped malformed chain IDs from pause batch");
            metrics::PAUSE_ENTRIES_SKIPPED
                .with_label_values(&[op])
                .inc_by(skipped as u64);
        }
        metrics::PAUSED_CHAINS.set(self.chains.len() as i64);
    }
}
