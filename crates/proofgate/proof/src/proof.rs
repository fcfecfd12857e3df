use proofgate_types::{CanonicalEncoder, ContentHash, FinalDecision, InvariantCategory, Phase};
use serde::{Deserialize, Serialize};

use crate::error::{ProofError, ProofResult};

pub const PROOF_DOMAIN: &str = "proofgate/decision-proof/v1";
pub const REDUCED_PROOF_DOMAIN: &str = "proofgate/decision-proof/reduced/v1";

/// One step in the causal chain from detection to decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalLink {
    /// Position in the chain, contiguous from 1.
    pub step: u32,
    pub layer: String,
    pub event: String,
    pub effect: String,
    pub deterministic: bool,
}

impl CausalLink {
    pub fn new(
        step: u32,
        layer: impl Into<String>,
        event: impl Into<String>,
        effect: impl Into<String>,
    ) -> Self {
        Self {
            step,
            layer: layer.into(),
            event: event.into(),
            effect: effect.into(),
            deterministic: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntropySnapshot {
    pub baseline: f64,
    pub current: f64,
    /// `|current - baseline|`
    pub drift: f64,
    pub phase: Phase,
}

impl EntropySnapshot {
    pub fn new(baseline: f64, current: f64, phase: Phase) -> Self {
        Self {
            baseline,
            current,
            drift: (current - baseline).abs(),
            phase,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub budget_initial: f64,
    pub budget_remaining: f64,
    /// `remaining / initial`, or 0 when `initial` is 0.
    pub budget_ratio: f64,
    pub budget_exhausted: bool,
}

impl ContractSnapshot {
    pub fn new(budget_initial: f64, budget_remaining: f64, budget_exhausted: bool) -> Self {
        Self {
            budget_initial,
            budget_remaining,
            budget_ratio: Self::ratio(budget_initial, budget_remaining),
            budget_exhausted,
        }
    }

    pub fn ratio(initial: f64, remaining: f64) -> f64 {
        if initial == 0.0 {
            0.0
        } else {
            remaining / initial
        }
    }
}

/// Unsealed proof contents.
///
/// Everything a proof holds except `reduced`, `immutable` and `hash`;
/// [`ProofDraft::seal`] fixes those.
#[derive(Clone, Debug, PartialEq)]
pub struct ProofDraft {
    pub run_id: String,
    pub action_fingerprint: ContentHash,
    pub final_decision: FinalDecision,
    pub primary_invariant: InvariantCategory,
    pub causal_chain: Vec<CausalLink>,
    pub forbidden_alternatives: Vec<ContentHash>,
    pub description: String,
    pub entropy_snapshot: Option<EntropySnapshot>,
    pub contract_snapshot: Option<ContractSnapshot>,
}

impl ProofDraft {
    /// Seal as an unreduced proof.
    pub fn seal(self) -> DecisionProof {
        self.seal_as(false)
    }

    pub(crate) fn seal_as(self, reduced: bool) -> DecisionProof {
        let mut proof = DecisionProof {
            run_id: self.run_id,
            action_fingerprint: self.action_fingerprint,
            final_decision: self.final_decision,
            primary_invariant: self.primary_invariant,
            causal_chain: self.causal_chain,
            forbidden_alternatives: self.forbidden_alternatives,
            description: self.description,
            entropy_snapshot: self.entropy_snapshot,
            contract_snapshot: self.contract_snapshot,
            reduced,
            immutable: true,
            hash: ContentHash::zero(),
        };
        proof.hash = proof.compute_hash();
        proof
    }
}

/// Immutable, hash-verifiable decision record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionProof {
    pub(crate) run_id: String,
    pub(crate) action_fingerprint: ContentHash,
    pub(crate) final_decision: FinalDecision,
    pub(crate) primary_invariant: InvariantCategory,
    pub(crate) causal_chain: Vec<CausalLink>,
    pub(crate) forbidden_alternatives: Vec<ContentHash>,
    pub(crate) description: String,
    pub(crate) entropy_snapshot: Option<EntropySnapshot>,
    pub(crate) contract_snapshot: Option<ContractSnapshot>,
    pub(crate) reduced: bool,
    pub(crate) immutable: bool,
    pub(crate) hash: ContentHash,
}

impl DecisionProof {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn action_fingerprint(&self) -> &ContentHash {
        &self.action_fingerprint
    }

    pub fn final_decision(&self) -> FinalDecision {
        self.final_decision
    }

    pub fn primary_invariant(&self) -> InvariantCategory {
        self.primary_invariant
    }

    pub fn causal_chain(&self) -> &[CausalLink] {
        &self.causal_chain
    }

    pub fn forbidden_alternatives(&self) -> &[ContentHash] {
        &self.forbidden_alternatives
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entropy_snapshot(&self) -> Option<&EntropySnapshot> {
        self.entropy_snapshot.as_ref()
    }

    pub fn contract_snapshot(&self) -> Option<&ContractSnapshot> {
        self.contract_snapshot.as_ref()
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// Copy the contents out for building a derived proof.
    pub fn to_draft(&self) -> ProofDraft {
        ProofDraft {
            run_id: self.run_id.clone(),
            action_fingerprint: self.action_fingerprint,
            final_decision: self.final_decision,
            primary_invariant: self.primary_invariant,
            causal_chain: self.causal_chain.clone(),
            forbidden_alternatives: self.forbidden_alternatives.clone(),
            description: self.description.clone(),
            entropy_snapshot: self.entropy_snapshot.clone(),
            contract_snapshot: self.contract_snapshot.clone(),
        }
    }

    pub fn domain(&self) -> &'static str {
        if self.reduced {
            REDUCED_PROOF_DOMAIN
        } else {
            PROOF_DOMAIN
        }
    }

    /// Canonical encoding of every field except `hash`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new(self.domain());
        enc.str(1, &self.run_id)
            .hash(2, &self.action_fingerprint)
            .str(3, self.final_decision.as_str())
            .str(4, self.primary_invariant.as_str())
            .seq(5, self.causal_chain.len());
        for link in &self.causal_chain {
            enc.u64(6, u64::from(link.step))
                .str(7, &link.layer)
                .str(8, &link.event)
                .str(9, &link.effect)
                .bool(10, link.deterministic);
        }
        enc.seq(11, self.forbidden_alternatives.len());
        for alternative in &self.forbidden_alternatives {
            enc.hash(12, alternative);
        }
        enc.str(13, &self.description);

        enc.bool(14, self.entropy_snapshot.is_some());
        if let Some(entropy) = &self.entropy_snapshot {
            enc.f64(15, entropy.baseline)
                .f64(16, entropy.current)
                .f64(17, entropy.drift)
                .str(18, entropy.phase.as_str());
        }
        enc.bool(19, self.contract_snapshot.is_some());
        if let Some(contract) = &self.contract_snapshot {
            enc.f64(20, contract.budget_initial)
                .f64(21, contract.budget_remaining)
                .f64(22, contract.budget_ratio)
                .bool(23, contract.budget_exhausted);
        }
        enc.bool(24, self.reduced).bool(25, self.immutable);
        enc.finish()
    }

    pub fn compute_hash(&self) -> ContentHash {
        ContentHash::hash(&self.canonical_bytes())
    }

    /// Fails with [`ProofError::Tampered`] when the stored hash is stale.
    pub fn verify_hash(&self) -> ProofResult<()> {
        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(ProofError::Tampered {
                stored: self.hash,
                computed,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> ProofResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ProofResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn draft() -> ProofDraft {
        ProofDraft {
            run_id: "run-1".into(),
            action_fingerprint: ContentHash::hash(b"rm -rf build/"),
            final_decision: FinalDecision::Block,
            primary_invariant: InvariantCategory::IntentDrift,
            causal_chain: vec![
                CausalLink::new(1, "intent", "INTENT_DRIFT detected", "scope widened"),
                CausalLink::new(2, "gate", "gate decision", "BLOCK"),
            ],
            forbidden_alternatives: vec![ContentHash::hash(b"alt")],
            description: "BLOCK: INTENT_DRIFT from intent".into(),
            entropy_snapshot: Some(EntropySnapshot::new(0.2, 0.35, Phase::Drifting)),
            contract_snapshot: Some(ContractSnapshot::new(100.0, 40.0, false)),
        }
    }

    #[test]
    fn sealing_sets_hash_and_immutable() {
        let proof = draft().seal();
        assert!(proof.is_immutable());
        assert!(!proof.is_reduced());
        assert_eq!(proof.hash().to_hex().len(), 64);
        assert!(proof.verify_hash().is_ok());
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(draft().seal().hash(), draft().seal().hash());
    }

    #[test]
    fn reduced_domain_changes_hash() {
        let plain = draft().seal();
        let reduced = draft().seal_as(true);
        assert_ne!(plain.hash(), reduced.hash());
        assert_eq!(reduced.domain(), REDUCED_PROOF_DOMAIN);
    }

    #[test]
    fn every_field_is_covered() {
        let base = draft().seal();

        let mut d = draft();
        d.description.push('!');
        assert_ne!(d.seal().hash(), base.hash());

        let mut d = draft();
        d.causal_chain[1].deterministic = false;
        assert_ne!(d.seal().hash(), base.hash());

        let mut d = draft();
        d.contract_snapshot = None;
        assert_ne!(d.seal().hash(), base.hash());

        let mut d = draft();
        d.forbidden_alternatives.clear();
        assert_ne!(d.seal().hash(), base.hash());
    }

    #[test]
    fn tampering_detected_after_json_edit() {
        let proof = draft().seal();
        let json = proof.to_json().unwrap();
        let edited = json.replace("\"BLOCK\"", "\"ALLOW\"");
        let tampered = DecisionProof::from_json(&edited).unwrap();
        assert!(matches!(
            tampered.verify_hash(),
            Err(ProofError::Tampered { .. })
        ));
    }

    #[test]
    fn json_round_trip_preserves_hash() {
        let proof = draft().seal();
        let back = DecisionProof::from_json(&proof.to_json().unwrap()).unwrap();
        assert_eq!(back, proof);
        assert!(back.verify_hash().is_ok());
    }

    #[test]
    fn ratio_is_zero_without_budget() {
        assert_eq!(ContractSnapshot::ratio(0.0, 5.0), 0.0);
        assert_eq!(ContractSnapshot::new(50.0, 25.0, false).budget_ratio, 0.5);
    }
}
