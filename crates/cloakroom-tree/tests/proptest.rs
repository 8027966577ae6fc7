//! property tests: accumulator and index agree, paths reproduce the root

use cloakroom_primitives::{Commitment, Fr};
use cloakroom_tree::{CommitmentIndex, LeafIndex, MerkleAccumulator, TreeError};
use proptest::prelude::*;

fn commitments() -> impl Strategy<Value = Vec<Commitment>> {
    prop::collection::vec(any::<u64>().prop_map(|v| Commitment(Fr::from_u64(v))), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn indices_are_sequential(leaves in commitments()) {
        let mut acc = MerkleAccumulator::new(6, 30).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            prop_assert_eq!(acc.append(*leaf).unwrap(), LeafIndex(i as u64));
        }
        prop_assert_eq!(acc.len(), leaves.len() as u64);
    }

    #[test]
    fn index_root_matches_accumulator(leaves in commitments()) {
        let mut acc = MerkleAccumulator::new(6, 30).unwrap();
        let mut index = CommitmentIndex::new(6).unwrap();
        for leaf in &leaves {
            acc.append(*leaf).unwrap();
            index.append(*leaf).unwrap();
            prop_assert_eq!(acc.root(), index.root());
        }
    }

    #[test]
    fn every_path_reproduces_current_root(leaves in commitments()) {
        let index = CommitmentIndex::from_commitments(6, leaves.iter().copied()).unwrap();
        let root = index.root();
        for (i, leaf) in leaves.iter().enumerate() {
            let path = index.path(LeafIndex(i as u64)).unwrap();
            prop_assert!(path.verify(leaf, &root));
        }
    }

    #[test]
    fn root_window_holds_last_r_roots(extra in 1usize..10, window in 1usize..6) {
        let mut acc = MerkleAccumulator::new(8, window).unwrap();
        let mut seen = vec![acc.root()];
        for v in 0..(window + extra) as u64 {
            acc.append(Commitment(Fr::from_u64(v))).unwrap();
            seen.push(acc.root());
        }
        let (old, recent) = seen.split_at(seen.len() - window);
        for root in recent {
            prop_assert!(acc.is_known_root(root));
        }
        for root in old {
            prop_assert!(!acc.is_known_root(root));
        }
    }
}

#[test]
fn capacity_is_two_to_the_height() {
    for height in 1..=4u8 {
        let mut acc = MerkleAccumulator::new(height, 4).unwrap();
        for v in 0..(1u64 << height) {
            acc.append(Commitment(Fr::from_u64(v))).unwrap();
        }
        assert_eq!(
            acc.append(Commitment(Fr::ZERO)).unwrap_err(),
            TreeError::TreeFull { capacity: 1u64 << height }
        );
    }
}
