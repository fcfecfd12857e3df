use proofgate_simulation::InevitabilityProof;
use proofgate_types::{CanonicalEncoder, ContentHash, InvariantCategory, Phase};
use serde::{Deserialize, Serialize};

pub const SIMULATED_VIOLATION_DOMAIN: &str = "proofgate/simulated-violation/v1";

/// Gate signal raised by an upstream layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateSignal {
    /// Restrict to read-only operations for this decision.
    ReadOnly,
    /// Restrict to read-only operations with no path back.
    Permanent,
}

/// Temporal budget state as seen by the budget layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub initial: f64,
    pub remaining: f64,
    pub exhausted: bool,
}

/// Entropy reading as seen by the entropy layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntropyReading {
    pub baseline: f64,
    pub current: f64,
    /// Phase reported upstream; classified from `current` when absent.
    #[serde(default)]
    pub phase: Option<Phase>,
}

/// An alternative the simulation layer rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulatedViolation {
    pub intervention_id: String,
    pub description: String,
}

impl SimulatedViolation {
    pub fn new(intervention_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            intervention_id: intervention_id.into(),
            description: description.into(),
        }
    }

    /// Content hash recorded in `forbidden_alternatives`.
    pub fn content_hash(&self) -> ContentHash {
        let mut enc = CanonicalEncoder::new(SIMULATED_VIOLATION_DOMAIN);
        enc.str(1, &self.intervention_id).str(2, &self.description);
        enc.digest()
    }
}

/// Verdict from one upstream layer.
///
/// Every optional field is explicit; nothing is read out of a loose map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum LayerReport {
    TemporalBudget {
        passed: bool,
        reason: String,
        #[serde(default)]
        budget: Option<BudgetSnapshot>,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
    Entropy {
        passed: bool,
        reason: String,
        #[serde(default)]
        snapshot: Option<EntropyReading>,
        #[serde(default)]
        gate_signal: Option<GateSignal>,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
    Intent {
        passed: bool,
        reason: String,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
    Necessity {
        passed: bool,
        reason: String,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
    Simulation {
        blocked: bool,
        reason: String,
        #[serde(default)]
        inevitability: Option<InevitabilityProof>,
        #[serde(default)]
        violations: Vec<SimulatedViolation>,
        #[serde(default)]
        gate_signal: Option<GateSignal>,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
    External {
        name: String,
        passed: bool,
        reason: String,
        #[serde(default)]
        gate_signal: Option<GateSignal>,
        #[serde(default)]
        category: Option<InvariantCategory>,
    },
}

impl LayerReport {
    pub fn temporal_budget(
        passed: bool,
        reason: impl Into<String>,
        budget: Option<BudgetSnapshot>,
    ) -> Self {
        Self::TemporalBudget {
            passed,
            reason: reason.into(),
            budget,
            category: None,
        }
    }

    pub fn entropy(passed: bool, reason: impl Into<String>, snapshot: Option<EntropyReading>) -> Self {
        Self::Entropy {
            passed,
            reason: reason.into(),
            snapshot,
            gate_signal: None,
            category: None,
        }
    }

    pub fn intent(passed: bool, reason: impl Into<String>) -> Self {
        Self::Intent {
            passed,
            reason: reason.into(),
            category: None,
        }
    }

    pub fn necessity(passed: bool, reason: impl Into<String>) -> Self {
        Self::Necessity {
            passed,
            reason: reason.into(),
            category: None,
        }
    }

    pub fn simulation(
        blocked: bool,
        reason: impl Into<String>,
        inevitability: Option<InevitabilityProof>,
        violations: Vec<SimulatedViolation>,
    ) -> Self {
        Self::Simulation {
            blocked,
            reason: reason.into(),
            inevitability,
            violations,
            gate_signal: None,
            category: None,
        }
    }

    pub fn external(name: impl Into<String>, passed: bool, reason: impl Into<String>) -> Self {
        Self::External {
            name: name.into(),
            passed,
            reason: reason.into(),
            gate_signal: None,
            category: None,
        }
    }

    /// State the violated category directly instead of parsing the reason.
    pub fn with_category(mut self, value: InvariantCategory) -> Self {
        match &mut self {
            Self::TemporalBudget { category, .. }
            | Self::Entropy { category, .. }
            | Self::Intent { category, .. }
            | Self::Necessity { category, .. }
            | Self::Simulation { category, .. }
            | Self::External { category, .. } => *category = Some(value),
        }
        self
    }

    /// Attach a gate signal. Layers without a signal field ignore it.
    pub fn with_gate_signal(mut self, signal: GateSignal) -> Self {
        match &mut self {
            Self::Entropy { gate_signal, .. }
            | Self::Simulation { gate_signal, .. }
            | Self::External { gate_signal, .. } => *gate_signal = Some(signal),
            Self::TemporalBudget { .. } | Self::Intent { .. } | Self::Necessity { .. } => {}
        }
        self
    }

    /// Layer name used in causal links.
    pub fn name(&self) -> &str {
        match self {
            Self::TemporalBudget { .. } => "temporal_budget",
            Self::Entropy { .. } => "entropy",
            Self::Intent { .. } => "intent",
            Self::Necessity { .. } => "necessity",
            Self::Simulation { .. } => "simulation",
            Self::External { name, .. } => name,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::TemporalBudget { reason, .. }
            | Self::Entropy { reason, .. }
            | Self::Intent { reason, .. }
            | Self::Necessity { reason, .. }
            | Self::Simulation { reason, .. }
            | Self::External { reason, .. } => reason,
        }
    }

    pub fn category(&self) -> Option<InvariantCategory> {
        match self {
            Self::TemporalBudget { category, .. }
            | Self::Entropy { category, .. }
            | Self::Intent { category, .. }
            | Self::Necessity { category, .. }
            | Self::Simulation { category, .. }
            | Self::External { category, .. } => *category,
        }
    }

    pub fn gate_signal(&self) -> Option<GateSignal> {
        match self {
            Self::Entropy { gate_signal, .. }
            | Self::Simulation { gate_signal, .. }
            | Self::External { gate_signal, .. } => *gate_signal,
            Self::TemporalBudget { .. } | Self::Intent { .. } | Self::Necessity { .. } => None,
        }
    }

    pub fn budget_exhausted(&self) -> bool {
        matches!(
            self,
            Self::TemporalBudget {
                budget: Some(BudgetSnapshot {
                    exhausted: true,
                    ..
                }),
                ..
            }
        )
    }

    pub fn is_inevitable(&self) -> bool {
        matches!(
            self,
            Self::Simulation {
                inevitability: Some(proof),
                ..
            } if proof.is_inevitable()
        )
    }

    /// Whether this layer contributes a violation.
    pub fn failed(&self) -> bool {
        let reported = match self {
            Self::TemporalBudget { passed, .. }
            | Self::Entropy { passed, .. }
            | Self::Intent { passed, .. }
            | Self::Necessity { passed, .. }
            | Self::External { passed, .. } => !passed,
            Self::Simulation { blocked, .. } => *blocked,
        };
        reported || self.gate_signal().is_some() || self.budget_exhausted() || self.is_inevitable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofgate_simulation::{FastestCollapse, PathOrigin, ProofType};

    fn inevitable() -> InevitabilityProof {
        InevitabilityProof {
            proof_type: ProofType::AllPathsCollapse,
            total_paths: 1,
            collapsing_paths: 1,
            confidence: Some(1.0),
            fastest_collapse: Some(FastestCollapse {
                origin: PathOrigin::NoAction,
                steps_to_collapse: 2,
            }),
        }
    }

    #[test]
    fn exhausted_budget_fails_even_when_passed() {
        let layer = LayerReport::temporal_budget(
            true,
            "within budget",
            Some(BudgetSnapshot {
                initial: 100.0,
                remaining: 0.0,
                exhausted: true,
            }),
        );
        assert!(layer.budget_exhausted());
        assert!(layer.failed());
    }

    #[test]
    fn inevitable_simulation_fails() {
        let layer = LayerReport::simulation(false, "ok", Some(inevitable()), vec![]);
        assert!(layer.is_inevitable());
        assert!(layer.failed());
    }

    #[test]
    fn gate_signal_only_on_signal_layers() {
        let intent = LayerReport::intent(true, "aligned").with_gate_signal(GateSignal::Permanent);
        assert_eq!(intent.gate_signal(), None);
        assert!(!intent.failed());

        let external = LayerReport::external("policy", true, "ok").with_gate_signal(GateSignal::ReadOnly);
        assert_eq!(external.gate_signal(), Some(GateSignal::ReadOnly));
        assert!(external.failed());
        assert_eq!(external.name(), "policy");
    }

    #[test]
    fn simulated_violation_hash_depends_on_content() {
        let a = SimulatedViolation::new("rollback", "drops table");
        let b = SimulatedViolation::new("rollback", "drops index");
        assert_eq!(a.content_hash(), a.clone().content_hash());
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn report_deserializes_with_defaults() {
        let json = r#"{"layer":"intent","passed":false,"reason":"drift"}"#;
        let layer: LayerReport = serde_json::from_str(json).unwrap();
        assert_eq!(layer, LayerReport::intent(false, "drift"));

        let json = r#"{"layer":"external","name":"lint","passed":true,"reason":"ok","category":"GENERIC_VIOLATION"}"#;
        let layer: LayerReport = serde_json::from_str(json).unwrap();
        assert_eq!(layer.category(), Some(InvariantCategory::GenericViolation));
    }
}
