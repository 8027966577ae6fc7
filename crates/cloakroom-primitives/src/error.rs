//! error types for cloakroom primitives

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("value is not below the field modulus")]
    OutOfRange,

    #[error("invalid hex field element: {0}")]
    InvalidHex(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("note string must start with {0}")]
    BadPrefix(&'static str),

    #[error("note body must be {expected} hex bytes, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error("note body is not valid hex")]
    BadHex,

    #[error("note field: {0}")]
    Field(#[from] FieldError),
}
