//! nullifier registry
//!
//! spent nullifier hashes, each with the transition sequence number that
//! spent it. entries are never removed: unspent -> spent is the only
//! transition.

use std::collections::HashMap;

use cloakroom_primitives::NullifierHash;

use crate::error::{Result, VaultError};

#[derive(Clone, Debug, Default)]
pub struct NullifierRegistry {
    spent: HashMap<NullifierHash, u64>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spent(&self, nullifier_hash: &NullifierHash) -> bool {
        self.spent.contains_key(nullifier_hash)
    }

    /// sequence number of the transition that spent `nullifier_hash`
    pub fn spent_at(&self, nullifier_hash: &NullifierHash) -> Option<u64> {
        self.spent.get(nullifier_hash).copied()
    }

    pub fn ensure_unspent(&self, nullifier_hash: &NullifierHash) -> Result<()> {
        if self.is_spent(nullifier_hash) {
            return Err(VaultError::AlreadySpent(*nullifier_hash));
        }
        Ok(())
    }

    /// record `nullifier_hash` as spent, failing if it already is
    pub fn mark_spent(&mut self, nullifier_hash: NullifierHash, sequence: u64) -> Result<()> {
        self.ensure_unspent(&nullifier_hash)?;
        self.spent.insert(nullifier_hash, sequence);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
