//! Aggregate configuration.
//!
//! Every section has a default, so an empty JSON object is a complete
//! configuration.

use std::path::{Path, PathBuf};

use proofgate_proof::{ReductionConfig, VerificationConfig};
use proofgate_simulation::SimulationConfig;
use proofgate_types::AuthorityClass;
use serde::{Deserialize, Serialize};

use crate::error::{ProofGateError, ProofGateResult};

/// Where attestations are chained, and on whose authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSONL chain file. `None` keeps the chain in memory.
    pub path: Option<PathBuf>,

    /// Authority recorded on every attestation.
    pub authority: AuthorityClass,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            path: None,
            authority: AuthorityClass::Project,
        }
    }
}

/// Subscriber settings for [`crate::telemetry::init_tracing`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Emit JSON lines instead of the human format.
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofGateConfig {
    pub simulation: SimulationConfig,
    pub reduction: ReductionConfig,
    pub verification: VerificationConfig,
    pub chain: ChainConfig,
    pub tracing: TracingConfig,
}

impl ProofGateConfig {
    pub fn from_json_str(json: &str) -> ProofGateResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ProofGateResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ProofGateResult<()> {
        self.simulation.validate()?;
        self.reduction.validate()?;
        self.verification.validate()?;
        if self.tracing.filter.trim().is_empty() {
            return Err(ProofGateError::Config("tracing.filter is empty".into()));
        }
        Ok(())
    }
}
