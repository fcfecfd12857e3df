use thiserror::Error;

/// Errors raised before a simulation starts. A running simulation never fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid state: {field} = {value} ({reason})")]
    InvalidState {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("simulation depth must be at least 1")]
    ZeroDepth,

    #[error("intervention id must not be empty")]
    EmptyInterventionId,

    #[error("duplicate intervention id: {0}")]
    DuplicateIntervention(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SimulationError::InvalidState {
            field: "entropy",
            value: "1.5".into(),
            reason: "must be within [0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid state: entropy = 1.5 (must be within [0, 1])"
        );
        assert!(SimulationError::DuplicateIntervention("rollback".into())
            .to_string()
            .contains("rollback"));
    }
}
