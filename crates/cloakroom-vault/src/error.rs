//! error types for the vault
//!
//! every [`VaultError`] is terminal for the call that produced it: the
//! transition was rejected before any state changed.

use cloakroom_primitives::{Asset, NullifierHash, Root};
use cloakroom_tree::{LeafIndex, TreeError};
use thiserror::Error;

use crate::custody::AccountId;
use crate::verifier::CircuitId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("merkle tree is full ({capacity} leaves)")]
    TreeFull { capacity: u64 },

    #[error("root {0} is stale or unknown, regenerate the proof against a recent root")]
    StaleOrUnknownRoot(Root),

    #[error("nullifier hash {0} already spent")]
    AlreadySpent(NullifierHash),

    #[error("{0} proof rejected")]
    ProofRejected(CircuitId),

    #[error("custody transfer failed: {0}")]
    CustodyTransferFailed(#[from] CustodyError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("asset {0} does not exist")]
    UnknownAsset(Asset),

    #[error("asset {0} already exists")]
    AlreadyMinted(Asset),

    #[error("account {account} does not own asset {asset}")]
    NotOwner { asset: Asset, account: AccountId },

    #[error("custodian is not approved for asset {0}")]
    NotApproved(Asset),

    #[error("asset {0} is not held in custody")]
    NotInCustody(Asset),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProverError {
    #[error("inconsistent witness: {0}")]
    InconsistentWitness(&'static str),

    #[error("proof encoding: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("deposit event out of order: expected leaf {expected}, found {found}")]
    LeafOutOfOrder { expected: LeafIndex, found: LeafIndex },

    #[error("commitment not found in event log")]
    UnknownCommitment,

    #[error("commitment index: {0}")]
    Tree(#[from] TreeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tree parameters: {0}")]
    Tree(#[from] TreeError),

    #[error("verifying key for {found} supplied where {expected} was expected")]
    KeyCircuitMismatch { expected: CircuitId, found: CircuitId },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;
