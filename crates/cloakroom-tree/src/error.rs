//! error types for the commitment tree

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("merkle tree is full ({capacity} leaves)")]
    TreeFull { capacity: u64 },

    #[error("tree height must be in 1..=32, got {0}")]
    InvalidHeight(u8),

    #[error("root history size must be at least 1")]
    InvalidRootHistorySize,

    #[error("leaf {index} not in tree of {len} leaves")]
    UnknownLeaf { index: u64, len: u64 },
}

pub type Result<T> = std::result::Result<T, TreeError>;
