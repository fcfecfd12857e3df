use proofgate_attestation::AttestationError;
use proofgate_authority::AuthorityError;
use proofgate_chain::ChainError;
use proofgate_proof::ProofError;
use proofgate_simulation::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofGateError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error(transparent)]
    Attestation(#[from] AttestationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProofGateResult<T> = Result<T, ProofGateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_crate_errors_pass_through() {
        let err = ProofGateError::from(SimulationError::ZeroDepth);
        assert_eq!(err.to_string(), SimulationError::ZeroDepth.to_string());

        let err = ProofGateError::Config("depth must be positive".into());
        assert_eq!(err.to_string(), "configuration error: depth must be positive");
    }
}
