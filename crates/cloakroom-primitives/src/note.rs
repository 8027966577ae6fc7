//! deposit notes
//!
//! a note is everything a holder needs to later spend a deposit: the two
//! secrets plus the asset they are bound to. it never leaves the holder,
//! except as the witness of a proof.

use core::fmt;
use core::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::codec::{
    derive_commitment, derive_nullifier_hash, derive_public_id, Asset, Commitment,
    NullifierHash, PublicId, TokenContract, TokenId,
};
use crate::error::NoteError;
use crate::field::{Fr, FIELD_BYTES};

/// prefix of the portable note string
pub const NOTE_PREFIX: &str = "cloakroom-note-v1-";

const NOTE_BODY_BYTES: usize = FIELD_BYTES * 4;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub secret_id: Fr,
    pub nullifier: Fr,
    pub asset: Asset,
}

impl Note {
    pub fn new(secret_id: Fr, nullifier: Fr, asset: Asset) -> Self {
        Self {
            secret_id,
            nullifier,
            asset,
        }
    }

    /// fresh secrets for `asset`
    pub fn random(asset: Asset, mut rng: impl RngCore) -> Self {
        let secret_id = Fr::random(&mut rng);
        let nullifier = Fr::random(&mut rng);
        Self::new(secret_id, nullifier, asset)
    }

    /// same asset, fresh secrets (the output side of a send)
    pub fn rekey(&self, rng: impl RngCore) -> Self {
        Self::random(self.asset, rng)
    }

    pub fn public_id(&self) -> PublicId {
        derive_public_id(self.secret_id)
    }

    pub fn nullifier_hash(&self) -> NullifierHash {
        derive_nullifier_hash(self.nullifier)
    }

    pub fn commitment(&self) -> Commitment {
        derive_commitment(
            self.nullifier,
            self.public_id(),
            self.asset.token_id,
            self.asset.token_contract,
        )
    }

    /// `cloakroom-note-v1-<secret_id><nullifier><token_contract><token_id>`
    pub fn encode(&self) -> String {
        let mut body = Vec::with_capacity(NOTE_BODY_BYTES);
        body.extend_from_slice(&self.secret_id.to_bytes_be());
        body.extend_from_slice(&self.nullifier.to_bytes_be());
        body.extend_from_slice(&self.asset.token_contract.0.to_bytes_be());
        body.extend_from_slice(&self.asset.token_id.0.to_bytes_be());
        format!("{}{}", NOTE_PREFIX, hex::encode(body))
    }

    pub fn decode(s: &str) -> Result<Self, NoteError> {
        let body = s
            .trim()
            .strip_prefix(NOTE_PREFIX)
            .ok_or(NoteError::BadPrefix(NOTE_PREFIX))?;
        let bytes = hex::decode(body).map_err(|_| NoteError::BadHex)?;
        if bytes.len() != NOTE_BODY_BYTES {
            return Err(NoteError::BadLength {
                expected: NOTE_BODY_BYTES,
                got: bytes.len(),
            });
        }

        let fields = bytes
            .chunks_exact(FIELD_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; FIELD_BYTES];
                buf.copy_from_slice(chunk);
                Fr::from_bytes_be(&buf)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            fields[0],
            fields[1],
            Asset::new(TokenContract(fields[2]), TokenId(fields[3])),
        ))
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("commitment", &self.commitment())
            .field("asset", &self.asset)
            .finish_non_exhaustive()
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn asset() -> Asset {
        Asset::new(TokenContract(Fr::from_u64(0xc0ffee)), TokenId(Fr::from_u64(1)))
    }

    #[test]
    fn test_note_string_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let note = Note::random(asset(), &mut rng);
        let s = note.encode();
        assert!(s.starts_with(NOTE_PREFIX));
        let back: Note = s.parse().unwrap();
        assert_eq!(back, note);
        assert_eq!(back.commitment(), note.commitment());
    }

    #[test]
    fn test_note_decode_errors() {
        assert_eq!(
            Note::decode("somenote-v2-00"),
            Err(NoteError::BadPrefix(NOTE_PREFIX))
        );
        assert_eq!(
            Note::decode(&format!("{}zz", NOTE_PREFIX)),
            Err(NoteError::BadHex)
        );
        assert_eq!(
            Note::decode(&format!("{}00", NOTE_PREFIX)),
            Err(NoteError::BadLength {
                expected: NOTE_BODY_BYTES,
                got: 1
            })
        );

        let mut body = "ff".repeat(FIELD_BYTES);
        body.push_str(&"00".repeat(FIELD_BYTES * 3));
        assert!(matches!(
            Note::decode(&format!("{}{}", NOTE_PREFIX, body)),
            Err(NoteError::Field(_))
        ));
    }

    #[test]
    fn test_rekey_keeps_asset() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let note = Note::random(asset(), &mut rng);
        let next = note.rekey(&mut rng);
        assert_eq!(next.asset, note.asset);
        assert_ne!(next.commitment(), note.commitment());
        assert_ne!(next.nullifier_hash(), note.nullifier_hash());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let note = Note::new(Fr::from_u64(0xdead), Fr::from_u64(0xbeef), asset());
        let dbg = format!("{:?}", note);
        assert!(!dbg.contains(&Fr::from_u64(0xdead).to_hex()));
        assert!(!dbg.contains(&Fr::from_u64(0xbeef).to_hex()));
    }
}
