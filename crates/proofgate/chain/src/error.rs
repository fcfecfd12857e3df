use std::path::PathBuf;

use thiserror::Error;

/// Errors from the hash chain and its stores.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("chain store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("append rejected at index {index}: {reason}")]
    AppendRejected { index: u64, reason: String },

    #[error("chain failed verification with {issues} issue(s); first at index {first_index}")]
    CorruptChain { issues: usize, first_index: u64 },

    #[error("chain store at {path} failed verification with {issues} issue(s)")]
    CorruptStore { path: PathBuf, issues: usize },

    #[error("chain writer is poisoned: {reason}; reopen it from the store")]
    WriterPoisoned { reason: String },

    #[error("malformed chain line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

pub type ChainResult<T> = Result<T, ChainError>;
