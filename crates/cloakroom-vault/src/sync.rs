//! event log replay
//!
//! rebuilds the commitment tree from the public event log and answers path
//! requests. replay happens once; afterwards each new event costs one append
//! in the [`CommitmentIndex`].

use std::collections::{HashMap, HashSet};

use cloakroom_primitives::{Commitment, Note, NullifierHash, Root};
use cloakroom_tree::{CommitmentIndex, LeafIndex, MerklePath};

use crate::error::SyncError;
use crate::event::VaultEvent;

#[derive(Clone, Debug)]
pub struct PathBuilder {
    index: CommitmentIndex,
    leaves_by_commitment: HashMap<Commitment, Vec<LeafIndex>>,
    spent: HashSet<NullifierHash>,
}

impl PathBuilder {
    pub fn new(height: u8) -> Result<Self, SyncError> {
        Ok(Self {
            index: CommitmentIndex::new(height)?,
            leaves_by_commitment: HashMap::new(),
            spent: HashSet::new(),
        })
    }

    pub fn from_events<'a, I>(height: u8, events: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = &'a VaultEvent>,
    {
        let mut builder = Self::new(height)?;
        for event in events {
            builder.observe(event)?;
        }
        Ok(builder)
    }

    /// apply the next event of the log
    pub fn observe(&mut self, event: &VaultEvent) -> Result<(), SyncError> {
        match *event {
            VaultEvent::Deposit {
                commitment,
                leaf_index,
            } => {
                let expected = LeafIndex(self.index.len());
                if leaf_index != expected {
                    return Err(SyncError::LeafOutOfOrder {
                        expected,
                        found: leaf_index,
                    });
                }
                self.index.append(commitment)?;
                self.leaves_by_commitment
                    .entry(commitment)
                    .or_default()
                    .push(leaf_index);
            }
            VaultEvent::Withdrawal { nullifier_hash } => {
                self.spent.insert(nullifier_hash);
            }
        }
        Ok(())
    }

    pub fn root(&self) -> Root {
        self.index.root()
    }

    pub fn len(&self) -> u64 {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// first leaf holding `commitment`
    pub fn locate(&self, commitment: &Commitment) -> Option<LeafIndex> {
        self.leaves_by_commitment
            .get(commitment)
            .and_then(|leaves| leaves.first().copied())
    }

    pub fn path_for(&self, leaf_index: LeafIndex) -> Result<MerklePath, SyncError> {
        Ok(self.index.path(leaf_index)?)
    }

    /// whether a withdrawal for `nullifier_hash` has been seen in the log
    pub fn is_spent(&self, nullifier_hash: &NullifierHash) -> bool {
        self.spent.contains(nullifier_hash)
    }

    /// current root and inclusion path for `note`
    pub fn witness_path(&self, note: &Note) -> Result<(Root, MerklePath), SyncError> {
        let leaf = self
            .locate(&note.commitment())
            .ok_or(SyncError::UnknownCommitment)?;
        Ok((self.root(), self.path_for(leaf)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloakroom_primitives::Fr;

    fn deposit(v: u64, index: u64) -> VaultEvent {
        VaultEvent::Deposit {
            commitment: Commitment(Fr::from_u64(v)),
            leaf_index: LeafIndex(index),
        }
    }

    #[test]
    fn test_replay_and_locate() {
        let events = vec![
            deposit(10, 0),
            VaultEvent::Withdrawal {
                nullifier_hash: NullifierHash(Fr::from_u64(99)),
            },
            deposit(11, 1),
            deposit(10, 2),
        ];
        let builder = PathBuilder::from_events(4, &events).unwrap();

        assert_eq!(builder.len(), 3);
        assert_eq!(builder.locate(&Commitment(Fr::from_u64(10))), Some(LeafIndex(0)));
        assert_eq!(builder.locate(&Commitment(Fr::from_u64(11))), Some(LeafIndex(1)));
        assert_eq!(builder.locate(&Commitment(Fr::from_u64(12))), None);
        assert!(builder.is_spent(&NullifierHash(Fr::from_u64(99))));

        let path = builder.path_for(LeafIndex(1)).unwrap();
        assert!(path.verify(&Commitment(Fr::from_u64(11)), &builder.root()));
    }

    #[test]
    fn test_gap_rejected() {
        let events = vec![deposit(10, 0), deposit(11, 2)];
        assert_eq!(
            PathBuilder::from_events(4, &events).unwrap_err(),
            SyncError::LeafOutOfOrder {
                expected: LeafIndex(1),
                found: LeafIndex(2)
            }
        );
    }
}
