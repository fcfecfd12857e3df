use std::collections::HashSet;
use std::fmt;

use proofgate_types::{FinalDecision, InvariantCategory};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ProofError, ProofResult};
use crate::proof::{ContractSnapshot, DecisionProof};

/// Verifier settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Absolute tolerance for derived snapshot values.
    pub tolerance: f64,
}

impl VerificationConfig {
    pub fn validate(&self) -> ProofResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ProofError::InvalidConfig(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

/// Which property a verification error concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationCheck {
    RequiredFields,
    Hash,
    StepContiguity,
    Determinism,
    DecisionConsistency,
    EntropyDrift,
    BudgetRatio,
    DuplicateAlternatives,
    Immutable,
}

impl VerificationCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredFields => "required_fields",
            Self::Hash => "hash",
            Self::StepContiguity => "step_contiguity",
            Self::Determinism => "determinism",
            Self::DecisionConsistency => "decision_consistency",
            Self::EntropyDrift => "entropy_drift",
            Self::BudgetRatio => "budget_ratio",
            Self::DuplicateAlternatives => "duplicate_alternatives",
            Self::Immutable => "immutable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationError {
    pub check: VerificationCheck,
    pub message: String,
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check.as_str(), self.message)
    }
}

/// Itemized verification outcome. `valid` iff `errors` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub errors: Vec<VerificationError>,
}

impl VerificationReport {
    pub fn failed(&self, check: VerificationCheck) -> bool {
        self.errors.iter().any(|e| e.check == check)
    }

    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Read-only structural and cryptographic checks over a proof.
#[derive(Clone, Debug, Default)]
pub struct ProofVerifier {
    config: VerificationConfig,
}

impl ProofVerifier {
    pub fn new(config: VerificationConfig) -> ProofResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run every check; nothing short-circuits.
    pub fn verify(&self, proof: &DecisionProof) -> VerificationReport {
        let mut errors = Vec::new();
        let mut fail = |check, message: String| errors.push(VerificationError { check, message });

        // Required fields.
        if proof.run_id.trim().is_empty() {
            fail(VerificationCheck::RequiredFields, "run_id is empty".into());
        }
        if proof.action_fingerprint.is_zero() {
            fail(
                VerificationCheck::RequiredFields,
                "action_fingerprint is unset".into(),
            );
        }
        if proof.description.trim().is_empty() {
            fail(VerificationCheck::RequiredFields, "description is empty".into());
        }

        // Hash.
        let computed = proof.compute_hash();
        if computed != proof.hash {
            fail(
                VerificationCheck::Hash,
                format!("stored {} != computed {}", proof.hash, computed),
            );
        }

        // Causal chain.
        for (i, link) in proof.causal_chain.iter().enumerate() {
            let expected = i as u32 + 1;
            if link.step != expected {
                fail(
                    VerificationCheck::StepContiguity,
                    format!("link {i} has step {}, expected {expected}", link.step),
                );
            }
            if !link.deterministic {
                fail(
                    VerificationCheck::Determinism,
                    format!("link {} ({}) is not deterministic", link.step, link.event),
                );
            }
        }

        // Decision vs primary invariant.
        if let Some(message) = decision_inconsistency(proof.final_decision, proof.primary_invariant)
        {
            fail(VerificationCheck::DecisionConsistency, message);
        }

        // Derived snapshot values.
        let tolerance = self.config.tolerance;
        if let Some(entropy) = &proof.entropy_snapshot {
            let expected = (entropy.current - entropy.baseline).abs();
            if exceeds(entropy.drift, expected, tolerance) {
                fail(
                    VerificationCheck::EntropyDrift,
                    format!("drift {} != |current - baseline| {}", entropy.drift, expected),
                );
            }
        }
        if let Some(contract) = &proof.contract_snapshot {
            let expected =
                ContractSnapshot::ratio(contract.budget_initial, contract.budget_remaining);
            if exceeds(contract.budget_ratio, expected, tolerance) {
                fail(
                    VerificationCheck::BudgetRatio,
                    format!("ratio {} != remaining / initial {}", contract.budget_ratio, expected),
                );
            }
        }

        let mut seen = HashSet::new();
        for alternative in &proof.forbidden_alternatives {
            if !seen.insert(alternative) {
                fail(
                    VerificationCheck::DuplicateAlternatives,
                    format!("alternative {} appears more than once", alternative.short()),
                );
            }
        }

        if !proof.immutable {
            fail(VerificationCheck::Immutable, "immutable flag is not set".into());
        }

        let report = VerificationReport {
            valid: errors.is_empty(),
            errors,
        };
        if report.failed(VerificationCheck::Hash) {
            warn!(run_id = %proof.run_id, stored = %proof.hash.short(), "proof hash mismatch");
        }
        report
    }

    /// Verify and turn failure into an error: [`ProofError::Tampered`] when
    /// the hash does not re-derive, [`ProofError::Invalid`] otherwise.
    pub fn ensure_valid(&self, proof: &DecisionProof) -> ProofResult<VerificationReport> {
        let report = self.verify(proof);
        if report.valid {
            return Ok(report);
        }
        if report.failed(VerificationCheck::Hash) {
            return Err(ProofError::Tampered {
                stored: proof.hash,
                computed: proof.compute_hash(),
            });
        }
        Err(ProofError::Invalid {
            count: report.errors.len(),
            summary: report.summary(),
        })
    }
}

/// NaN never passes.
fn exceeds(actual: f64, expected: f64, tolerance: f64) -> bool {
    let diff = (actual - expected).abs();
    diff.is_nan() || diff > tolerance
}

fn decision_inconsistency(decision: FinalDecision, primary: InvariantCategory) -> Option<String> {
    match decision {
        FinalDecision::Allow if primary != InvariantCategory::None => {
            Some(format!("ALLOW with primary invariant {primary}"))
        }
        FinalDecision::Block | FinalDecision::ReadOnly if primary == InvariantCategory::None => {
            Some(format!("{decision} without a primary invariant"))
        }
        FinalDecision::PermanentReadOnly if !primary.permits_permanent_read_only() => Some(format!(
            "PERMANENT_READ_ONLY requires BUDGET_EXHAUSTED, INEVITABLE_COLLAPSE or ENTROPY_COLLAPSE, got {primary}"
        )),
        _ => None,
    }
}
