//! cloakroom commitment tree
//!
//! two views of the same append-only tree of commitments:
//!
//! - [`MerkleAccumulator`]: authoritative, frontier plus recent-root ring,
//!   used by the vault to accept or reject proof anchors
//! - [`CommitmentIndex`]: off-chain, keeps every populated node so that
//!   holders can fetch inclusion paths in O(height)
//!
//! both hash nodes with the same mimc sponge as the codec and agree on the
//! root after the same sequence of appends.

pub mod accumulator;
pub mod error;
pub mod index;
pub mod path;
pub mod zeros;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use accumulator::MerkleAccumulator;
pub use error::{Result, TreeError};
pub use index::CommitmentIndex;
pub use path::MerklePath;
pub use zeros::EmptyRoots;

/// deepest supported tree (2^32 leaves)
pub const MAX_HEIGHT: u8 = 32;

/// position of a leaf, assigned in strict insertion order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafIndex(pub u64);

impl fmt::Display for LeafIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
