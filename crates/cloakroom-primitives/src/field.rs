//! field elements
//!
//! every public value in the vault (commitments, nullifier hashes, roots,
//! token references) is an element of the pallas base field. externally they
//! travel as 32-byte big-endian integers, rendered as `0x`-prefixed hex.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use pasta_curves::group::ff::{Field, FromUniformBytes, PrimeField};
use pasta_curves::Fp;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// canonical byte length of an encoded field element
pub const FIELD_BYTES: usize = 32;

/// element of the pallas base field
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fr(pub(crate) Fp);

impl Fr {
    pub const ZERO: Self = Self(Fp::ZERO);
    pub const ONE: Self = Self(Fp::ONE);

    pub fn from_u64(v: u64) -> Self {
        Self(Fp::from(v))
    }

    /// decode a big-endian integer, rejecting values >= the field modulus
    pub fn from_bytes_be(bytes: &[u8; FIELD_BYTES]) -> Result<Self, FieldError> {
        let mut repr = *bytes;
        repr.reverse();
        Option::<Fp>::from(Fp::from_repr(repr))
            .map(Self)
            .ok_or(FieldError::OutOfRange)
    }

    pub fn to_bytes_be(&self) -> [u8; FIELD_BYTES] {
        let mut bytes = self.0.to_repr();
        bytes.reverse();
        bytes
    }

    /// parse `0x`-prefixed (or bare) hex of at most 64 digits
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > FIELD_BYTES * 2 {
            return Err(FieldError::InvalidHex(s.to_string()));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; FIELD_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| FieldError::InvalidHex(s.to_string()))?;
        Self::from_bytes_be(&bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes_be()))
    }

    /// uniformly random element
    pub fn random(rng: impl RngCore) -> Self {
        Self(Fp::random(rng))
    }

    /// reduce 64 uniform bytes into the field (used for nothing-up-my-sleeve constants)
    pub fn from_uniform_bytes(bytes: &[u8; 64]) -> Self {
        Self(<Fp as FromUniformBytes<64>>::from_uniform_bytes(bytes))
    }

    /// hash an arbitrary domain string into the field via the blake3 xof
    pub fn from_domain(domain: &[u8], index: u32) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(&index.to_le_bytes());
        let mut wide = [0u8; 64];
        hasher.finalize_xof().fill(&mut wide);
        Self::from_uniform_bytes(&wide)
    }

    pub fn is_zero(&self) -> bool {
        bool::from(self.0.is_zero())
    }
}

impl Default for Fr {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for Fr {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl Hash for Fr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_repr().hash(state);
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fr({})", self.to_hex())
    }
}

impl FromStr for Fr {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Fr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// declares a typed wrapper around [`Fr`] for one role in the protocol
macro_rules! field_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $crate::field::Fr);

        impl $name {
            pub fn inner(&self) -> $crate::field::Fr {
                self.0
            }

            pub fn from_hex(s: &str) -> Result<Self, $crate::error::FieldError> {
                $crate::field::Fr::from_hex(s).map(Self)
            }
        }

        impl From<$crate::field::Fr> for $name {
            fn from(v: $crate::field::Fr) -> Self {
                Self(v)
            }
        }

        impl From<$name> for $crate::field::Fr {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::error::FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }
    };
}

pub(crate) use field_newtype;
