use std::collections::HashSet;

use proofgate_types::{ContentHash, FinalDecision, InvariantCategory, Phase};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::classify_reason;
use crate::error::{ProofError, ProofResult};
use crate::layer::{GateSignal, LayerReport};
use crate::proof::{CausalLink, ContractSnapshot, DecisionProof, EntropySnapshot, ProofDraft};

/// A failing layer mapped onto the taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub layer: String,
    pub category: InvariantCategory,
    pub reason: String,
    pub gate_signal: Option<GateSignal>,
}

/// Builds sealed decision proofs from layer reports.
///
/// Assembly is a pure function of `(run_id, action, layers)`; no clock or
/// random source is read, so identical inputs seal identical hashes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProofAssembler;

impl ProofAssembler {
    pub fn new() -> Self {
        Self
    }

    /// One violation per failing layer, in layer order.
    pub fn violations(&self, layers: &[LayerReport]) -> Vec<Violation> {
        layers
            .iter()
            .filter(|layer| layer.failed())
            .map(|layer| Violation {
                layer: layer.name().to_string(),
                category: resolve_category(layer),
                reason: layer.reason().to_string(),
                gate_signal: layer.gate_signal(),
            })
            .collect()
    }

    pub fn assemble(
        &self,
        run_id: &str,
        action: &[u8],
        layers: &[LayerReport],
    ) -> ProofResult<DecisionProof> {
        if run_id.trim().is_empty() {
            return Err(ProofError::MissingRunId);
        }

        let violations = self.violations(layers);
        // First minimum wins, so equal categories keep layer order.
        let primary = violations.iter().min_by_key(|v| v.category.priority());
        let final_decision = decide(primary, &violations);
        let primary_invariant = primary
            .map(|v| v.category)
            .unwrap_or(InvariantCategory::None);

        let proof = ProofDraft {
            run_id: run_id.to_string(),
            action_fingerprint: ContentHash::hash(action),
            final_decision,
            primary_invariant,
            causal_chain: causal_chain(primary, final_decision, layers),
            forbidden_alternatives: forbidden_alternatives(layers),
            description: describe(primary, final_decision, violations.len(), layers.len()),
            entropy_snapshot: entropy_snapshot(layers),
            contract_snapshot: contract_snapshot(layers),
        }
        .seal();

        info!(
            run_id,
            decision = %final_decision,
            primary_invariant = %primary_invariant,
            violations = violations.len(),
            hash = %proof.hash().short(),
            "decision proof assembled"
        );
        Ok(proof)
    }
}

/// Category for a failing layer.
///
/// An exhausted budget always wins. Otherwise an explicit category, then
/// evidence carried by the layer, then reason markers. A permanent gate
/// signal is finally escalated to a category that permits
/// PERMANENT_READ_ONLY.
pub fn resolve_category(layer: &LayerReport) -> InvariantCategory {
    if layer.budget_exhausted() {
        return InvariantCategory::BudgetExhausted;
    }

    let category = layer
        .category()
        .filter(InvariantCategory::is_violation)
        .or_else(|| forced_category(layer))
        .unwrap_or_else(|| classify_reason(layer.reason()));

    if layer.gate_signal() == Some(GateSignal::Permanent) && !category.permits_permanent_read_only()
    {
        return match layer {
            LayerReport::Simulation { .. } => InvariantCategory::InevitableCollapse,
            _ => InvariantCategory::EntropyCollapse,
        };
    }
    category
}

fn forced_category(layer: &LayerReport) -> Option<InvariantCategory> {
    let permanent = layer.gate_signal() == Some(GateSignal::Permanent);
    match layer {
        LayerReport::Entropy { .. } if permanent => Some(InvariantCategory::EntropyCollapse),
        LayerReport::Simulation { .. } if permanent || layer.is_inevitable() => {
            Some(InvariantCategory::InevitableCollapse)
        }
        _ => None,
    }
}

fn decide(primary: Option<&Violation>, violations: &[Violation]) -> FinalDecision {
    let Some(primary) = primary else {
        return FinalDecision::Allow;
    };
    // Exhausted budgets resolve to BudgetExhausted, which always ranks first.
    let permanent = primary.category == InvariantCategory::BudgetExhausted
        || violations
            .iter()
            .any(|v| v.gate_signal == Some(GateSignal::Permanent));
    if permanent {
        FinalDecision::PermanentReadOnly
    } else if violations
        .iter()
        .any(|v| v.gate_signal == Some(GateSignal::ReadOnly))
    {
        FinalDecision::ReadOnly
    } else {
        FinalDecision::Block
    }
}

fn causal_chain(
    primary: Option<&Violation>,
    decision: FinalDecision,
    layers: &[LayerReport],
) -> Vec<CausalLink> {
    let Some(primary) = primary else {
        if layers.is_empty() {
            return Vec::new();
        }
        return vec![CausalLink::new(1, "gate", "check passed", "action permitted")];
    };

    let effect = if primary.reason.is_empty() {
        primary.category.as_str().to_string()
    } else {
        primary.reason.clone()
    };
    let mut chain = vec![CausalLink::new(
        1,
        primary.layer.clone(),
        format!("{} detected", primary.category),
        effect,
    )];

    let simulation = layers.iter().find_map(|layer| match layer {
        LayerReport::Simulation {
            inevitability: Some(proof),
            ..
        } => Some(proof),
        _ => None,
    });
    if let Some(proof) = simulation {
        chain.push(CausalLink::new(
            2,
            "simulation",
            "simulation result",
            proof.summary(),
        ));
    }

    let step = chain.len() as u32 + 1;
    chain.push(CausalLink::new(step, "gate", "gate decision", decision.as_str()));
    chain
}

fn forbidden_alternatives(layers: &[LayerReport]) -> Vec<ContentHash> {
    let mut seen = HashSet::new();
    layers
        .iter()
        .filter_map(|layer| match layer {
            LayerReport::Simulation { violations, .. } => Some(violations),
            _ => None,
        })
        .flatten()
        .map(|violation| violation.content_hash())
        .filter(|hash| seen.insert(*hash))
        .collect()
}

fn describe(
    primary: Option<&Violation>,
    decision: FinalDecision,
    violation_count: usize,
    layer_count: usize,
) -> String {
    let Some(primary) = primary else {
        return if layer_count == 0 {
            format!("{decision}: no layers reported")
        } else {
            format!("{decision}: all {layer_count} layer(s) passed")
        };
    };

    let mut out = format!("{decision}: {} detected by {}", primary.category, primary.layer);
    if !primary.reason.is_empty() {
        out.push_str(": ");
        out.push_str(&primary.reason);
    }
    if violation_count > 1 {
        out.push_str(&format!(" [+{} more]", violation_count - 1));
    }
    out
}

fn entropy_snapshot(layers: &[LayerReport]) -> Option<EntropySnapshot> {
    layers.iter().find_map(|layer| match layer {
        LayerReport::Entropy {
            snapshot: Some(reading),
            ..
        } => Some(EntropySnapshot::new(
            reading.baseline,
            reading.current,
            reading
                .phase
                .unwrap_or_else(|| Phase::classify(reading.current)),
        )),
        _ => None,
    })
}

fn contract_snapshot(layers: &[LayerReport]) -> Option<ContractSnapshot> {
    layers.iter().find_map(|layer| match layer {
        LayerReport::TemporalBudget {
            budget: Some(budget),
            ..
        } => Some(ContractSnapshot::new(
            budget.initial,
            budget.remaining,
            budget.exhausted,
        )),
        _ => None,
    })
}
