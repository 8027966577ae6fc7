//! cloakroom vault
//!
//! private custody for non-fungible tokens. a depositor locks an asset and
//! publishes a commitment to it; later any holder of the note secrets can
//! move the claim to a fresh commitment (`send`) or take the asset back out
//! (`withdraw`) without revealing which deposit they spend.
//!
//! # architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Vault (state machine, &mut self)                         │
//! │  ├─ MerkleAccumulator   frontier + recent roots window   │
//! │  ├─ NullifierRegistry   spent nullifier hashes           │
//! │  ├─ ProofVerifier       send / withdraw circuits         │
//! │  ├─ AssetCustody        nft ledger backend               │
//! │  └─ Vec<VaultEvent>     public append-only log           │
//! └──────────────────────────────────────────────────────────┘
//!        │ events
//!        v
//! ┌──────────────────────┐     ┌──────────────────────────┐
//! │ PathBuilder (sync)   │ ──> │ ProofGenerator (prover)  │
//! │  CommitmentIndex     │     │  witness -> Proof        │
//! └──────────────────────┘     └──────────────────────────┘
//! ```

pub mod config;
pub mod custody;
pub mod error;
pub mod event;
pub mod nullifier;
pub mod prover;
pub mod sync;
pub mod transparent;
pub mod vault;
pub mod verifier;

pub use config::{VaultConfig, DEFAULT_ROOT_HISTORY_SIZE, DEFAULT_TREE_HEIGHT};
pub use custody::{AccountId, AssetCustody, NftLedger};
pub use error::{ConfigError, CustodyError, ProverError, Result, SyncError, VaultError};
pub use event::VaultEvent;
pub use nullifier::NullifierRegistry;
pub use prover::{ProofGenerator, ProvingKey, SendWitness, WithdrawWitness};
pub use sync::PathBuilder;
pub use transparent::{TransparentProver, TransparentSetup, TransparentVerifier};
pub use vault::{Outcome, Vault, VaultCall};
pub use verifier::{
    CircuitId, Proof, ProofVerifier, SendStatement, VerifyingKey, VerifyingKeys,
    WithdrawStatement,
};
