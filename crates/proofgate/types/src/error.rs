use thiserror::Error;

/// Errors from parsing shared ProofGate types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hash length: expected 64 hex chars, got {0}")]
    InvalidHashLength(usize),

    #[error("invalid hex in hash: {0}")]
    InvalidHex(String),

    #[error("unknown authority level: {0}")]
    UnknownAuthorityLevel(u8),
}

pub type TypesResult<T> = Result<T, TypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::InvalidHashLength(12);
        assert!(err.to_string().contains("12"));

        let err = TypesError::UnknownAuthorityLevel(9);
        assert!(err.to_string().contains("9"));
    }
}
