//! cloakroom primitives
//!
//! field elements, the mimc sponge and the commitment codec shared by the
//! vault, the off-chain path builder and the circuits.
//!
//! # derivation
//!
//! ```text
//!   secret_id ──H──> public_id ─┐
//!   nullifier ──────────────────┼──H──> commitment  (tree leaf)
//!   token_id, token_contract ───┘
//!   nullifier ──H──> nullifier_hash                 (revealed on spend)
//! ```

pub mod codec;
pub mod error;
pub mod field;
pub mod mimc;
pub mod note;

pub use codec::{
    derive_commitment, derive_nullifier_hash, derive_public_id, Asset, Commitment,
    NullifierHash, PublicId, Root, TokenContract, TokenId, COMMITMENT_LAYOUT_VERSION,
};
pub use error::{FieldError, NoteError};
pub use field::Fr;
pub use note::Note;

/// domain separator for the empty merkle leaf
pub const EMPTY_LEAF_DOMAIN: &[u8] = b"cloakroom.tree.empty-leaf.v1";
