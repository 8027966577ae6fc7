//! empty subtree hashes
//!
//! `zeros[0]` is the empty-leaf constant, `zeros[i + 1] = H(zeros[i], zeros[i])`.
//! an empty tree of height h therefore has root `zeros[h]`.

use cloakroom_primitives::{mimc, Fr, EMPTY_LEAF_DOMAIN};

#[derive(Clone, Debug)]
pub struct EmptyRoots {
    levels: Vec<Fr>,
}

impl EmptyRoots {
    pub fn new(height: u8) -> Self {
        let mut levels = Vec::with_capacity(height as usize + 1);
        let mut current = empty_leaf();
        levels.push(current);
        for _ in 0..height {
            current = mimc::hash_pair(current, current);
            levels.push(current);
        }
        Self { levels }
    }

    /// empty subtree root at `level` (0 = leaf)
    pub fn at(&self, level: usize) -> Fr {
        self.levels[level]
    }

    pub fn height(&self) -> u8 {
        (self.levels.len() - 1) as u8
    }
}

/// value of an unused leaf slot
pub fn empty_leaf() -> Fr {
    Fr::from_domain(EMPTY_LEAF_DOMAIN, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_chain() {
        let zeros = EmptyRoots::new(4);
        assert_eq!(zeros.height(), 4);
        assert_eq!(zeros.at(0), empty_leaf());
        for level in 0..4 {
            assert_eq!(
                zeros.at(level + 1),
                mimc::hash_pair(zeros.at(level), zeros.at(level))
            );
        }
    }

    #[test]
    fn test_prefix_stable_across_heights() {
        let short = EmptyRoots::new(3);
        let long = EmptyRoots::new(8);
        for level in 0..=3 {
            assert_eq!(short.at(level), long.at(level));
        }
    }
}
