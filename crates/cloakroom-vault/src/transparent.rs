//! transparent reference backend
//!
//! a prover/verifier pair that checks the send and withdraw relations in the
//! clear. the "proof" is the encoded witness, so it reveals every secret and
//! links old and new notes: use it for tests and devnets, never for deposits
//! that need privacy.
//!
//! the relation checked here is exactly what the circuits must enforce:
//! - the note's commitment is included at the stated root via a path of
//!   exactly the tree height
//! - the note's nullifier hashes to the stated nullifier hash
//! - send: the new commitment derives from a note bound to the same asset
//! - withdraw: the note is bound to the stated asset

use serde::{Deserialize, Serialize};
use tracing::debug;

use cloakroom_primitives::Fr;
use cloakroom_tree::MerklePath;

use crate::error::ProverError;
use crate::prover::{ProofGenerator, ProvingKey, SendWitness, WithdrawWitness};
use crate::verifier::{
    key_fingerprint, CircuitId, Proof, ProofVerifier, SendStatement, VerifyingKey, VerifyingKeys,
    WithdrawStatement,
};

/// domain separator for transparent key derivation
pub const SETUP_DOMAIN: &[u8] = b"cloakroom.transparent-setup.v1";

#[derive(Serialize, Deserialize)]
pub(crate) enum TransparentProof {
    Send {
        key_tag: [u8; 32],
        witness: SendWitness,
    },
    Withdraw {
        key_tag: [u8; 32],
        witness: WithdrawWitness,
    },
}

/// key material for both circuits at one tree height, derived from a seed
#[derive(Clone, Debug)]
pub struct TransparentSetup {
    tree_height: u8,
    send: ProvingKey,
    withdraw: ProvingKey,
}

impl TransparentSetup {
    pub fn from_seed(seed: &[u8], tree_height: u8) -> Self {
        let derive = |circuit: CircuitId| {
            let mut hasher = blake3::Hasher::new();
            hasher.update(SETUP_DOMAIN);
            hasher.update(circuit.as_str().as_bytes());
            hasher.update(&[tree_height]);
            hasher.update(seed);
            ProvingKey::new(circuit, hasher.finalize().as_bytes().to_vec())
        };
        Self {
            tree_height,
            send: derive(CircuitId::Send),
            withdraw: derive(CircuitId::Withdraw),
        }
    }

    pub fn tree_height(&self) -> u8 {
        self.tree_height
    }

    pub fn verifying_keys(&self) -> VerifyingKeys {
        let vk = |pk: &ProvingKey| VerifyingKey::new(pk.circuit(), pk.as_bytes().to_vec());
        VerifyingKeys {
            send: vk(&self.send),
            withdraw: vk(&self.withdraw),
        }
    }

    pub fn prover(&self) -> TransparentProver {
        TransparentProver {
            tree_height: self.tree_height,
            send: self.send.clone(),
            withdraw: self.withdraw.clone(),
        }
    }

    pub fn verifier(&self) -> TransparentVerifier {
        TransparentVerifier::new(self.verifying_keys(), self.tree_height)
    }
}

#[derive(Clone, Debug)]
pub struct TransparentProver {
    tree_height: u8,
    send: ProvingKey,
    withdraw: ProvingKey,
}

impl TransparentProver {
    pub(crate) fn encode(proof: &TransparentProof) -> Result<Proof, ProverError> {
        bincode::serialize(proof)
            .map(Proof)
            .map_err(|e| ProverError::Encoding(e.to_string()))
    }

    fn ensure_depth(&self, path: &MerklePath) -> Result<(), ProverError> {
        if path.height() != self.tree_height as usize {
            return Err(ProverError::InconsistentWitness(
                "path depth does not match the tree height",
            ));
        }
        Ok(())
    }
}

impl ProofGenerator for TransparentProver {
    fn prove_send(
        &self,
        statement: &SendStatement,
        witness: &SendWitness,
    ) -> Result<Proof, ProverError> {
        if witness.statement() != *statement {
            return Err(ProverError::InconsistentWitness(
                "send witness does not satisfy statement",
            ));
        }
        if !witness.preserves_asset() {
            return Err(ProverError::InconsistentWitness("new note changes the asset"));
        }
        self.ensure_depth(&witness.path)?;
        Self::encode(&TransparentProof::Send {
            key_tag: key_fingerprint(self.send.circuit(), self.send.as_bytes()),
            witness: witness.clone(),
        })
    }

    fn prove_withdraw(
        &self,
        statement: &WithdrawStatement,
        witness: &WithdrawWitness,
    ) -> Result<Proof, ProverError> {
        if witness.statement() != *statement {
            return Err(ProverError::InconsistentWitness(
                "withdraw witness does not satisfy statement",
            ));
        }
        self.ensure_depth(&witness.path)?;
        Self::encode(&TransparentProof::Withdraw {
            key_tag: key_fingerprint(self.withdraw.circuit(), self.withdraw.as_bytes()),
            witness: witness.clone(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct TransparentVerifier {
    keys: VerifyingKeys,
    tree_height: u8,
}

impl TransparentVerifier {
    pub fn new(keys: VerifyingKeys, tree_height: u8) -> Self {
        Self { keys, tree_height }
    }

    pub fn tree_height(&self) -> u8 {
        self.tree_height
    }

    pub fn keys(&self) -> &VerifyingKeys {
        &self.keys
    }

    fn key_matches(&self, circuit: CircuitId, key_tag: &[u8; 32]) -> bool {
        self.keys.get(circuit).fingerprint() == *key_tag
    }

    fn depth_matches(&self, path: &MerklePath) -> bool {
        path.height() == self.tree_height as usize
    }
}

impl ProofVerifier for TransparentVerifier {
    fn verify(&self, circuit: CircuitId, proof: &Proof, public_inputs: &[Fr]) -> bool {
        let decoded: TransparentProof = match bincode::deserialize(proof.as_bytes()) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(%circuit, error = %e, "undecodable proof");
                return false;
            }
        };

        match (circuit, decoded) {
            (CircuitId::Send, TransparentProof::Send { key_tag, witness }) => {
                self.key_matches(circuit, &key_tag)
                    && self.depth_matches(&witness.path)
                    && witness.preserves_asset()
                    && witness.statement().public_inputs() == public_inputs
            }
            (CircuitId::Withdraw, TransparentProof::Withdraw { key_tag, witness }) => {
                self.key_matches(circuit, &key_tag)
                    && self.depth_matches(&witness.path)
                    && witness.statement().public_inputs() == public_inputs
            }
            _ => false,
        }
    }
}

/// encode a send proof for `witness` under `setup`'s key, skipping every
/// prover-side check
#[cfg(test)]
pub(crate) fn encode_unchecked_send(setup: &TransparentSetup, witness: &SendWitness) -> Proof {
    TransparentProver::encode(&TransparentProof::Send {
        key_tag: key_fingerprint(CircuitId::Send, setup.send.as_bytes()),
        witness: witness.clone(),
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloakroom_primitives::{Asset, Note, TokenContract, TokenId};
    use cloakroom_tree::CommitmentIndex;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn asset(id: u64) -> Asset {
        Asset::new(TokenContract(Fr::from_u64(0xc0ffee)), TokenId(Fr::from_u64(id)))
    }

    fn send_fixture() -> (SendWitness, SendStatement) {
        send_fixture_at(8)
    }

    fn send_fixture_at(height: u8) -> (SendWitness, SendStatement) {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let note = Note::random(asset(1), &mut rng);
        let index = CommitmentIndex::from_commitments(height, [note.commitment()]).unwrap();
        let witness = SendWitness {
            note,
            path: index.path(cloakroom_tree::LeafIndex(0)).unwrap(),
            new_note: note.rekey(&mut rng),
        };
        let statement = witness.statement();
        assert_eq!(statement.root, index.root());
        (witness, statement)
    }

    #[test]
    fn test_send_roundtrip() {
        let setup = TransparentSetup::from_seed(b"test", 8);
        let (witness, statement) = send_fixture();
        let proof = setup.prover().prove_send(&statement, &witness).unwrap();
        let verifier = setup.verifier();

        assert!(verifier.verify(CircuitId::Send, &proof, &statement.public_inputs()));
        // wrong circuit
        assert!(!verifier.verify(CircuitId::Withdraw, &proof, &statement.public_inputs()));
        // tampered public input
        let mut inputs = statement.public_inputs();
        inputs[2] = Fr::from_u64(5);
        assert!(!verifier.verify(CircuitId::Send, &proof, &inputs));
    }

    #[test]
    fn test_foreign_setup_rejected() {
        let (witness, statement) = send_fixture();
        let proof = TransparentSetup::from_seed(b"other", 8)
            .prover()
            .prove_send(&statement, &witness)
            .unwrap();
        let verifier = TransparentSetup::from_seed(b"test", 8).verifier();
        assert!(!verifier.verify(CircuitId::Send, &proof, &statement.public_inputs()));
    }

    #[test]
    fn test_prover_refuses_asset_change() {
        let setup = TransparentSetup::from_seed(b"test", 8);
        let (mut witness, _) = send_fixture();
        witness.new_note.asset = asset(2);
        let statement = witness.statement();
        assert_eq!(
            setup.prover().prove_send(&statement, &witness),
            Err(ProverError::InconsistentWitness("new note changes the asset"))
        );
    }

    #[test]
    fn test_prover_refuses_mismatched_statement() {
        let setup = TransparentSetup::from_seed(b"test", 8);
        let (witness, mut statement) = send_fixture();
        statement.new_commitment = cloakroom_primitives::Commitment(Fr::from_u64(1));
        assert!(setup.prover().prove_send(&statement, &witness).is_err());
    }

    #[test]
    fn test_garbage_proof_rejected() {
        let verifier = TransparentSetup::from_seed(b"test", 8).verifier();
        assert!(!verifier.verify(CircuitId::Withdraw, &Proof(vec![1, 2, 3]), &[]));
    }

    #[test]
    fn test_verifier_rejects_asset_change() {
        let setup = TransparentSetup::from_seed(b"test", 8);
        let verifier = setup.verifier();

        // unchecked encoding of an honest witness is accepted
        let (witness, statement) = send_fixture();
        let proof = encode_unchecked_send(&setup, &witness);
        assert!(verifier.verify(CircuitId::Send, &proof, &statement.public_inputs()));

        // new note bound to another asset, inputs matching the forged witness
        let (mut witness, _) = send_fixture();
        witness.new_note.asset = asset(2);
        let statement = witness.statement();
        let proof = encode_unchecked_send(&setup, &witness);
        assert!(!verifier.verify(CircuitId::Send, &proof, &statement.public_inputs()));
    }

    #[test]
    fn test_path_depth_must_match_tree() {
        let setup = TransparentSetup::from_seed(b"test", 8);
        let (witness, statement) = send_fixture_at(4);

        assert_eq!(
            setup.prover().prove_send(&statement, &witness),
            Err(ProverError::InconsistentWitness(
                "path depth does not match the tree height"
            ))
        );
        let proof = encode_unchecked_send(&setup, &witness);
        assert!(!setup
            .verifier()
            .verify(CircuitId::Send, &proof, &statement.public_inputs()));

        // the same witness is fine for a tree of its own height
        let shallow = TransparentSetup::from_seed(b"test", 4);
        let proof = shallow.prover().prove_send(&statement, &witness).unwrap();
        assert!(shallow
            .verifier()
            .verify(CircuitId::Send, &proof, &statement.public_inputs()));
    }

    #[test]
    fn test_keys_differ_per_height() {
        let deep = TransparentSetup::from_seed(b"test", 8).verifying_keys();
        let shallow = TransparentSetup::from_seed(b"test", 4).verifying_keys();
        assert_ne!(
            deep.get(CircuitId::Send).fingerprint(),
            shallow.get(CircuitId::Send).fingerprint()
        );
    }
}
