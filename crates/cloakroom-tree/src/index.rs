//! off-chain commitment index
//!
//! the accumulator only keeps a frontier, so inclusion paths must be rebuilt
//! from the ordered leaf sequence. instead of replaying the whole log per
//! request, this index keeps every populated node in a per-level arena:
//! appends and path lookups both touch one node per level.
//!
//! `levels[0]` holds the leaves, `levels[l][i]` the node covering leaves
//! `i << l .. (i + 1) << l`. nodes right of the populated prefix are implicit
//! empty subtrees.

use cloakroom_primitives::{mimc, Commitment, Fr, Root};

use crate::error::{Result, TreeError};
use crate::path::MerklePath;
use crate::zeros::EmptyRoots;
use crate::{LeafIndex, MAX_HEIGHT};

#[derive(Clone, Debug)]
pub struct CommitmentIndex {
    height: u8,
    zeros: EmptyRoots,
    levels: Vec<Vec<Fr>>,
}

impl CommitmentIndex {
    pub fn new(height: u8) -> Result<Self> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(TreeError::InvalidHeight(height));
        }
        Ok(Self {
            height,
            zeros: EmptyRoots::new(height),
            levels: vec![Vec::new(); height as usize + 1],
        })
    }

    /// rebuild from the full ordered leaf sequence
    pub fn from_commitments<I>(height: u8, commitments: I) -> Result<Self>
    where
        I: IntoIterator<Item = Commitment>,
    {
        let mut index = Self::new(height)?;
        for commitment in commitments {
            index.append(commitment)?;
        }
        Ok(index)
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn len(&self) -> u64 {
        self.levels[0].len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.height
    }

    pub fn leaf(&self, index: LeafIndex) -> Option<Commitment> {
        self.levels[0].get(index.0 as usize).copied().map(Commitment)
    }

    fn node(&self, level: usize, position: usize) -> Fr {
        self.levels[level]
            .get(position)
            .copied()
            .unwrap_or_else(|| self.zeros.at(level))
    }

    pub fn append(&mut self, commitment: Commitment) -> Result<LeafIndex> {
        if self.len() >= self.capacity() {
            return Err(TreeError::TreeFull {
                capacity: self.capacity(),
            });
        }

        let leaf_index = self.levels[0].len();
        self.levels[0].push(commitment.0);

        let mut position = leaf_index;
        for level in 0..self.height as usize {
            let parent = position >> 1;
            let left = self.node(level, parent << 1);
            let right = self.node(level, (parent << 1) | 1);
            let hash = mimc::hash_pair(left, right);

            let above = &mut self.levels[level + 1];
            if parent < above.len() {
                above[parent] = hash;
            } else {
                above.push(hash);
            }
            position = parent;
        }

        Ok(LeafIndex(leaf_index as u64))
    }

    pub fn root(&self) -> Root {
        Root(self.node(self.height as usize, 0))
    }

    /// inclusion path for `index` against the current root
    pub fn path(&self, index: LeafIndex) -> Result<MerklePath> {
        if index.0 >= self.len() {
            return Err(TreeError::UnknownLeaf {
                index: index.0,
                len: self.len(),
            });
        }

        let mut position = index.0 as usize;
        let siblings = (0..self.height as usize)
            .map(|level| {
                let sibling = self.node(level, position ^ 1);
                position >>= 1;
                sibling
            })
            .collect();

        Ok(MerklePath {
            leaf_index: index,
            siblings,
        })
    }
}
