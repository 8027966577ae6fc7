//! merkle inclusion paths

use serde::{Deserialize, Serialize};

use cloakroom_primitives::{mimc, Commitment, Fr, Root};

use crate::LeafIndex;

/// sibling hashes from leaf level up to (not including) the root
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    pub leaf_index: LeafIndex,
    pub siblings: Vec<Fr>,
}

impl MerklePath {
    pub fn height(&self) -> usize {
        self.siblings.len()
    }

    /// per level: `true` when the path node is the right child
    pub fn path_indices(&self) -> Vec<bool> {
        (0..self.siblings.len())
            .map(|level| (self.leaf_index.0 >> level) & 1 == 1)
            .collect()
    }

    /// root obtained by hashing `leaf` up along this path
    pub fn compute_root(&self, leaf: &Commitment) -> Root {
        let mut current = leaf.0;
        let mut index = self.leaf_index.0;
        for sibling in &self.siblings {
            current = if index & 1 == 0 {
                mimc::hash_pair(current, *sibling)
            } else {
                mimc::hash_pair(*sibling, current)
            };
            index >>= 1;
        }
        Root(current)
    }

    /// verify that `leaf` is in the tree with the given root
    pub fn verify(&self, leaf: &Commitment, root: &Root) -> bool {
        self.compute_root(leaf) == *root
    }
}
