//! proof generation interface
//!
//! proving happens off-chain, against an inclusion path fetched from the
//! event log. the witness carries the secrets; the statement it attests is
//! what the vault sees.

use serde::{Deserialize, Serialize};

use cloakroom_primitives::Note;
use cloakroom_tree::MerklePath;

use crate::error::ProverError;
use crate::verifier::{CircuitId, Proof, SendStatement, WithdrawStatement};

/// proving key for one circuit
#[derive(Clone, PartialEq, Eq)]
pub struct ProvingKey {
    circuit: CircuitId,
    bytes: Vec<u8>,
}

impl ProvingKey {
    pub fn new(circuit: CircuitId, bytes: Vec<u8>) -> Self {
        Self { circuit, bytes }
    }

    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for ProvingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ProvingKey({}, {} bytes)", self.circuit, self.bytes.len())
    }
}

/// private inputs of a send: the spent note, its path, and the note replacing it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendWitness {
    pub note: Note,
    pub path: MerklePath,
    pub new_note: Note,
}

impl SendWitness {
    /// statement this witness satisfies
    pub fn statement(&self) -> SendStatement {
        SendStatement {
            root: self.path.compute_root(&self.note.commitment()),
            old_nullifier_hash: self.note.nullifier_hash(),
            new_commitment: self.new_note.commitment(),
        }
    }

    /// the new note must control the same asset as the old one
    pub fn preserves_asset(&self) -> bool {
        self.note.asset == self.new_note.asset
    }
}

/// private inputs of a withdraw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawWitness {
    pub note: Note,
    pub path: MerklePath,
}

impl WithdrawWitness {
    pub fn statement(&self) -> WithdrawStatement {
        WithdrawStatement {
            root: self.path.compute_root(&self.note.commitment()),
            nullifier_hash: self.note.nullifier_hash(),
            asset: self.note.asset,
        }
    }
}

pub trait ProofGenerator {
    fn prove_send(
        &self,
        statement: &SendStatement,
        witness: &SendWitness,
    ) -> Result<Proof, ProverError>;

    fn prove_withdraw(
        &self,
        statement: &WithdrawStatement,
        witness: &WithdrawWitness,
    ) -> Result<Proof, ProverError>;
}
