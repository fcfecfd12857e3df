use proofgate_types::ContentHash;
use thiserror::Error;

/// Errors from proof assembly, reduction and verification.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Stored hash does not match the re-derived one.
    #[error("proof tampered: stored hash {stored} != computed {computed}")]
    Tampered {
        stored: ContentHash,
        computed: ContentHash,
    },

    #[error("proof failed verification with {count} error(s): {summary}")]
    Invalid { count: usize, summary: String },

    #[error("run id must not be empty")]
    MissingRunId,

    #[error("invalid stop-word pattern: {0}")]
    StopWords(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ProofResult<T> = Result<T, ProofError>;
