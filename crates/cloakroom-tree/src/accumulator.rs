//! authoritative commitment accumulator
//!
//! fixed-height append-only merkle tree that keeps only what the vault needs
//! to accept proofs:
//! - the "filled subtrees" frontier, one node per level, for O(height) appends
//! - a ring of the last `root_history_size` roots
//!
//! leaves themselves are not stored; they live in the event log and are
//! indexed off-chain by [`crate::CommitmentIndex`].

use cloakroom_primitives::{mimc, Commitment, Fr, Root};

use crate::error::{Result, TreeError};
use crate::zeros::EmptyRoots;
use crate::{LeafIndex, MAX_HEIGHT};

#[derive(Clone, Debug)]
pub struct MerkleAccumulator {
    height: u8,
    /// next free leaf slot
    next_index: u64,
    zeros: EmptyRoots,
    /// rightmost completed left-child at each level
    filled_subtrees: Vec<Fr>,
    /// ring buffer of recent roots, `None` until first written
    roots: Vec<Option<Root>>,
    current_root_index: usize,
}

impl MerkleAccumulator {
    pub fn new(height: u8, root_history_size: usize) -> Result<Self> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(TreeError::InvalidHeight(height));
        }
        if root_history_size == 0 {
            return Err(TreeError::InvalidRootHistorySize);
        }

        let zeros = EmptyRoots::new(height);
        let filled_subtrees = (0..height as usize).map(|level| zeros.at(level)).collect();

        // the empty root is a valid anchor from the start
        let mut roots = vec![None; root_history_size];
        roots[0] = Some(Root(zeros.at(height as usize)));

        Ok(Self {
            height,
            next_index: 0,
            zeros,
            filled_subtrees,
            roots,
            current_root_index: 0,
        })
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn root_history_size(&self) -> usize {
        self.roots.len()
    }

    /// number of leaves appended so far
    pub fn len(&self) -> u64 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.height
    }

    pub fn is_full(&self) -> bool {
        self.next_index >= self.capacity()
    }

    /// fails with `TreeFull` if no slot is left for another leaf
    pub fn ensure_capacity(&self) -> Result<()> {
        if self.is_full() {
            return Err(TreeError::TreeFull {
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    pub fn root(&self) -> Root {
        self.roots[self.current_root_index]
            .unwrap_or(Root(self.zeros.at(self.height as usize)))
    }

    /// append a commitment at the next free index, updating the root in O(height)
    pub fn append(&mut self, commitment: Commitment) -> Result<LeafIndex> {
        self.ensure_capacity()?;

        let leaf_index = self.next_index;
        let mut index = leaf_index;
        let mut current = commitment.0;

        for level in 0..self.height as usize {
            let (left, right) = if index & 1 == 0 {
                self.filled_subtrees[level] = current;
                (current, self.zeros.at(level))
            } else {
                (self.filled_subtrees[level], current)
            };
            current = mimc::hash_pair(left, right);
            index >>= 1;
        }

        self.current_root_index = (self.current_root_index + 1) % self.roots.len();
        self.roots[self.current_root_index] = Some(Root(current));
        self.next_index += 1;

        Ok(LeafIndex(leaf_index))
    }

    /// current root or one of the retained recent roots
    pub fn is_known_root(&self, root: &Root) -> bool {
        self.roots.iter().flatten().any(|known| known == root)
    }

    /// retained roots, newest first
    pub fn recent_roots(&self) -> impl Iterator<Item = Root> + '_ {
        let len = self.roots.len();
        (0..len).filter_map(move |back| self.roots[(self.current_root_index + len - back) % len])
    }
}
