//! Multichain Token Index
//!
//! Maps a logical token ID to its contract address on each chain. Token IDs
//! are case-insensitive; chain IDs are used exactly as given. Entries are only
//! ever added; a configuration reload swaps in a whole new table.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::normalize::normalize_key;
use crate::types::ChainId;

/// tokenID (lower-case) → chainID → token address
pub type MultichainTokenTable = HashMap<String, HashMap<String, String>>;

/// One row of the diagnostic dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultichainTokenEntry {
    pub token_id: String,
    pub chain_id: String,
    pub address: String,
}

#[derive(Default)]
pub struct MultichainTokenIndex {
    tokens: RwLock<MultichainTokenTable>,
}

impl MultichainTokenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a table, lower-casing token IDs.
    pub fn from_table(table: MultichainTokenTable) -> Self {
        let index = Self::new();
        index.replace_all(table);
        index
    }

    // Writers only ever perform whole inserts or swaps, so a poisoned lock
    // still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, MultichainTokenTable> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MultichainTokenTable> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token address of `token_id` on `chain_id`.
    pub fn get(&self, token_id: &str, chain_id: &str) -> Option<String> {
        self.read()
            .get(&normalize_key(token_id))
            .and_then(|chains| chains.get(chain_id))
            .cloned()
    }

    /// Snapshot of every chain address known for `token_id`.
    pub fn get_all(&self, token_id: &str) -> Option<HashMap<String, String>> {
        self.read().get(&normalize_key(token_id)).cloned()
    }

    /// Add one entry. Returns false if the address is empty or the pair is
    /// already indexed.
    pub fn insert(&self, token_id: &str, chain_id: &str, address: &str) -> bool {
        if address.is_empty() || chain_id.is_empty() {
            return false;
        }
        let mut tokens = self.write();
        let chains = tokens.entry(normalize_key(token_id)).or_default();
        if chains.contains_key(chain_id) {
            return false;
        }
        chains.insert(chain_id.to_string(), address.to_string());
        true
    }

    /// Replace the whole table (configuration reload).
    pub fn replace_all(&self, table: MultichainTokenTable) {
        let mut normalized = MultichainTokenTable::with_capacity(table.len());
        for (token_id, chains) in table {
            let entry = normalized.entry(normalize_key(&token_id)).or_default();
            for (chain_id, address) in chains {
                if !address.is_empty() {
                    entry.entry(chain_id).or_insert(address);
                }
            }
        }
        *self.write() = normalized;
    }

    /// Indexed token IDs, sorted.
    pub fn token_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Every (token, chain, address) triple, sorted by token then chain.
    pub fn dump(&self) -> Vec<MultichainTokenEntry> {
        let mut entries: Vec<MultichainTokenEntry> = self
            .read()
            .iter()
            .flat_map(|(token_id, chains)| {
                chains.iter().map(move |(chain_id, address)| MultichainTokenEntry {
                    token_id: token_id.clone(),
                    chain_id: chain_id.clone(),
                    address: address.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            a.token_id
                .cmp(&b.token_id)
                .then_with(|| compare_chain_keys(&a.chain_id, &b.chain_id))
        });
        entries
    }

    /// Log the full index at info level.
    pub fn log_all(&self) {
        let entries = self.dump();
        tracing::info!(count = entries.len(), "Begin multichain token dump");
        for entry in &entries {
            tracing::info!(
                token_id = %entry.token_id,
                chain_id = %entry.chain_id,
                address = %entry.address,
                "Multichain token"
            );
        }
        tracing::info!("End multichain token dump");
    }
}

// Numeric order when both keys parse, string order otherwise.
fn compare_chain_keys(a: &str, b: &str) -> std::cmp::Ordering {
    match (ChainId::parse(a), ChainId::parse(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
