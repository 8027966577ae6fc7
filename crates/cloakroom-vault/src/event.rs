//! vault events
//!
//! the append-only public log. off-chain readers rebuild the commitment tree
//! from `Deposit` events in leaf order and learn spent nullifiers from
//! `Withdrawal` events.

use serde::{Deserialize, Serialize};

use cloakroom_primitives::{Commitment, NullifierHash};
use cloakroom_tree::LeafIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    /// commitment appended to the tree
    Deposit {
        commitment: Commitment,
        leaf_index: LeafIndex,
    },
    /// nullifier hash spent (no other info)
    Withdrawal { nullifier_hash: NullifierHash },
}
