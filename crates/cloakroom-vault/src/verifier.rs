//! proof verification interface
//!
//! the vault treats verification as a pure oracle: a circuit id, opaque proof
//! bytes and a public input vector go in, accept or reject comes out. the
//! circuit itself and the ceremony that produced its key live elsewhere.
//!
//! public inputs, in order:
//! - send: `[root, old_nullifier_hash, new_commitment]`
//! - withdraw: `[root, nullifier_hash, token_id, token_contract]`

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cloakroom_primitives::{Asset, Commitment, Fr, NullifierHash, Root};

use crate::error::ConfigError;

/// domain separator for key fingerprints
pub const KEY_FINGERPRINT_DOMAIN: &[u8] = b"cloakroom.key-fingerprint.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitId {
    Send,
    Withdraw,
}

impl CircuitId {
    pub const ALL: [CircuitId; 2] = [CircuitId::Send, CircuitId::Withdraw];

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitId::Send => "send",
            CircuitId::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// opaque proof bytes
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(#[serde(with = "hex::serde")] pub Vec<u8>);

impl Proof {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({} bytes)", self.0.len())
    }
}

pub(crate) fn key_fingerprint(circuit: CircuitId, bytes: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(KEY_FINGERPRINT_DOMAIN);
    hasher.update(circuit.as_str().as_bytes());
    hasher.update(bytes);
    *hasher.finalize().as_bytes()
}

/// verifying key for one circuit, immutable after setup
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    circuit: CircuitId,
    bytes: Vec<u8>,
}

impl VerifyingKey {
    pub fn new(circuit: CircuitId, bytes: Vec<u8>) -> Self {
        Self { circuit, bytes }
    }

    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> [u8; 32] {
        key_fingerprint(self.circuit, &self.bytes)
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VerifyingKey({}, {})",
            self.circuit,
            hex::encode(&self.fingerprint()[..8])
        )
    }
}

/// one verifying key per circuit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKeys {
    pub(crate) send: VerifyingKey,
    pub(crate) withdraw: VerifyingKey,
}

impl VerifyingKeys {
    pub fn new(send: VerifyingKey, withdraw: VerifyingKey) -> Result<Self, ConfigError> {
        for (expected, key) in [(CircuitId::Send, &send), (CircuitId::Withdraw, &withdraw)] {
            if key.circuit() != expected {
                return Err(ConfigError::KeyCircuitMismatch {
                    expected,
                    found: key.circuit(),
                });
            }
        }
        Ok(Self { send, withdraw })
    }

    pub fn get(&self, circuit: CircuitId) -> &VerifyingKey {
        match circuit {
            CircuitId::Send => &self.send,
            CircuitId::Withdraw => &self.withdraw,
        }
    }
}

pub trait ProofVerifier {
    /// accept or reject `proof` for `circuit` against `public_inputs`
    fn verify(&self, circuit: CircuitId, proof: &Proof, public_inputs: &[Fr]) -> bool;
}

impl<T: ProofVerifier + ?Sized> ProofVerifier for &T {
    fn verify(&self, circuit: CircuitId, proof: &Proof, public_inputs: &[Fr]) -> bool {
        (**self).verify(circuit, proof, public_inputs)
    }
}

impl<T: ProofVerifier + ?Sized> ProofVerifier for Box<T> {
    fn verify(&self, circuit: CircuitId, proof: &Proof, public_inputs: &[Fr]) -> bool {
        (**self).verify(circuit, proof, public_inputs)
    }
}

impl<T: ProofVerifier + ?Sized> ProofVerifier for Arc<T> {
    fn verify(&self, circuit: CircuitId, proof: &Proof, public_inputs: &[Fr]) -> bool {
        (**self).verify(circuit, proof, public_inputs)
    }
}

/// public inputs of a send proof
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendStatement {
    pub root: Root,
    pub old_nullifier_hash: NullifierHash,
    pub new_commitment: Commitment,
}

impl SendStatement {
    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![
            self.root.0,
            self.old_nullifier_hash.0,
            self.new_commitment.0,
        ]
    }
}

/// public inputs of a withdraw proof
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawStatement {
    pub root: Root,
    pub nullifier_hash: NullifierHash,
    pub asset: Asset,
}

impl WithdrawStatement {
    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![
            self.root.0,
            self.nullifier_hash.0,
            self.asset.token_id.0,
            self.asset.token_contract.0,
        ]
    }
}
