use proofgate_chain::ChainError;
use proofgate_proof::ProofError;
use thiserror::Error;

/// Errors from attestation.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// The proof did not pass verification and was not attested.
    #[error("proof rejected: {0}")]
    Rejected(#[from] ProofError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Raised by side-channel sinks; the emitter logs and ignores it.
    #[error("sink {sink} failed: {reason}")]
    Sink { sink: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AttestationResult<T> = Result<T, AttestationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AttestationError::Sink {
            sink: "webhook".into(),
            reason: "timeout".into(),
        };
        assert_eq!(err.to_string(), "sink webhook failed: timeout");

        let err = AttestationError::from(ProofError::MissingRunId);
        assert!(err.to_string().starts_with("proof rejected"));
    }
}
