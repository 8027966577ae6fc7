//! commitment codec
//!
//! derives the public identifiers of a deposit from the holder's secrets:
//!
//! ```text
//! public_id      = H(secret_id)
//! nullifier_hash = H(nullifier)
//! commitment     = H(nullifier, public_id, token_id, token_contract)
//! ```
//!
//! the commitment argument order is part of the deployment, see
//! [`COMMITMENT_LAYOUT_VERSION`]. state committed under one layout cannot be
//! spent under another, so there is deliberately no second layout here.

use serde::{Deserialize, Serialize};

use crate::field::{field_newtype, Fr};
use crate::mimc;

/// version of the commitment input order `(nullifier, public_id, token_id, token_contract)`
pub const COMMITMENT_LAYOUT_VERSION: u8 = 1;

field_newtype!(
    /// public half of the holder identity, `H(secret_id)`
    PublicId
);

field_newtype!(
    /// revealed when a commitment is spent, `H(nullifier)`
    NullifierHash
);

field_newtype!(
    /// leaf value stored in the accumulator
    Commitment
);

field_newtype!(
    /// merkle root of the commitment tree
    Root
);

field_newtype!(
    /// token id within its contract
    TokenId
);

field_newtype!(
    /// token contract identifier, reduced into the field
    TokenContract
);

/// reference to one non-fungible asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub token_contract: TokenContract,
    pub token_id: TokenId,
}

impl Asset {
    pub fn new(token_contract: TokenContract, token_id: TokenId) -> Self {
        Self {
            token_contract,
            token_id,
        }
    }
}

impl core::fmt::Display for Asset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.token_id, self.token_contract)
    }
}

pub fn derive_public_id(secret_id: Fr) -> PublicId {
    PublicId(mimc::hash1(secret_id))
}

pub fn derive_nullifier_hash(nullifier: Fr) -> NullifierHash {
    NullifierHash(mimc::hash1(nullifier))
}

pub fn derive_commitment(
    nullifier: Fr,
    public_id: PublicId,
    token_id: TokenId,
    token_contract: TokenContract,
) -> Commitment {
    Commitment(mimc::hash4(
        nullifier,
        public_id.0,
        token_id.0,
        token_contract.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset() -> (TokenId, TokenContract) {
        (TokenId(Fr::from_u64(1)), TokenContract(Fr::from_u64(0xc0ffee)))
    }

    #[test]
    fn test_derivations_deterministic() {
        let secret = Fr::from_u64(11);
        let nf = Fr::from_u64(22);
        let (id, contract) = asset();

        let pid = derive_public_id(secret);
        assert_eq!(pid, derive_public_id(secret));
        assert_eq!(derive_nullifier_hash(nf), derive_nullifier_hash(nf));
        assert_eq!(
            derive_commitment(nf, pid, id, contract),
            derive_commitment(nf, pid, id, contract)
        );
    }

    #[test]
    fn test_public_id_and_nullifier_hash_share_primitive() {
        // same preimage, same hash: the roles are separated by the caller, not the hash
        let x = Fr::from_u64(5);
        assert_eq!(derive_public_id(x).0, derive_nullifier_hash(x).0);
    }

    #[test]
    fn test_commitment_binds_every_field() {
        let nf = Fr::from_u64(22);
        let pid = derive_public_id(Fr::from_u64(11));
        let (id, contract) = asset();
        let base = derive_commitment(nf, pid, id, contract);

        assert_ne!(base, derive_commitment(Fr::from_u64(23), pid, id, contract));
        assert_ne!(
            base,
            derive_commitment(nf, derive_public_id(Fr::from_u64(12)), id, contract)
        );
        assert_ne!(
            base,
            derive_commitment(nf, pid, TokenId(Fr::from_u64(2)), contract)
        );
        assert_ne!(
            base,
            derive_commitment(nf, pid, id, TokenContract(Fr::from_u64(0xbeef)))
        );
    }

    #[test]
    fn test_commitment_order_is_fixed() {
        let nf = Fr::from_u64(22);
        let pid = derive_public_id(Fr::from_u64(11));
        let (id, contract) = asset();
        // swapping token id and contract must not collide
        let swapped = derive_commitment(nf, pid, TokenId(contract.0), TokenContract(id.0));
        assert_ne!(derive_commitment(nf, pid, id, contract), swapped);
    }
}
