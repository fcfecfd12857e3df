use proofgate_types::{AuthorityClass, InvariantCategory};
use thiserror::Error;

/// Errors from the authority hierarchy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("authority registry accessed before bootstrap")]
    NotBootstrapped,

    #[error("authority registry already bootstrapped")]
    AlreadyBootstrapped,

    #[error("cannot widen refuters of {category}: {class} is not permitted by its supremacy level")]
    RefuterExpansion {
        category: InvariantCategory,
        class: AuthorityClass,
    },

    #[error("refutation aborted: {reason}")]
    RefutationAborted { reason: String },
}

pub type AuthorityResult<T> = Result<T, AuthorityError>;
