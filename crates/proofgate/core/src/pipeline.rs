//! End-to-end decision pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use proofgate_attestation::{AttestationEmitter, AttestationRecord, AttestationSink};
use proofgate_authority::{AuthorityRegistry, RefutationDecision, RefutationValidator};
use proofgate_chain::{
    ChainPayload, ChainVerification, ChainWriter, JsonlChainStore, Ledger, LedgerRecord,
};
use proofgate_proof::{
    DecisionProof, LayerReport, ProofAssembler, ProofReducer, ProofVerifier, SimulatedViolation,
    VerificationReport,
};
use proofgate_simulation::{
    CausalPath, CausalSimulator, InevitabilityDetector, InevitabilityProof, Intervention,
    PathOrigin, StateSnapshot,
};
use proofgate_types::{AuthorityClass, CanonicalEncoder, ContentHash, FinalDecision, InvariantCategory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProofGateConfig;
use crate::error::ProofGateResult;

pub const VIOLATION_DOMAIN: &str = "proofgate/violation/v1";

/// A non-ALLOW decision, as kept in the violation ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationEntry {
    pub run_id: String,
    pub proof_hash: ContentHash,
    pub decision: FinalDecision,
    pub invariant: InvariantCategory,
    pub description: String,
}

impl ViolationEntry {
    pub fn from_proof(proof: &DecisionProof) -> Self {
        Self {
            run_id: proof.run_id().to_string(),
            proof_hash: *proof.hash(),
            decision: proof.final_decision(),
            invariant: proof.primary_invariant(),
            description: proof.description().to_string(),
        }
    }
}

impl ChainPayload for ViolationEntry {
    fn domain(&self) -> &'static str {
        VIOLATION_DOMAIN
    }

    fn encode_fields(&self, enc: &mut CanonicalEncoder) {
        enc.str(1, &self.run_id)
            .hash(2, &self.proof_hash)
            .str(3, self.decision.as_str())
            .str(4, self.invariant.as_str())
            .str(5, &self.description);
    }
}

/// What one pass through the pipeline produced.
#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    /// The attested proof, reduced when it exceeded the configured caps.
    pub proof: DecisionProof,
    pub report: VerificationReport,
    pub attestation: AttestationRecord,
}

impl PipelineOutcome {
    pub fn decision(&self) -> FinalDecision {
        self.proof.final_decision()
    }
}

/// Assemble, minimize, verify and attest decisions.
pub struct DecisionPipeline {
    simulator: CausalSimulator,
    detector: InevitabilityDetector,
    assembler: ProofAssembler,
    reducer: ProofReducer,
    verifier: ProofVerifier,
    emitter: AttestationEmitter,
    registry: AuthorityRegistry,
    violations: Mutex<Ledger<ViolationEntry>>,
}

impl DecisionPipeline {
    /// Build from configuration, opening the JSONL chain when a path is set.
    pub async fn from_config(config: &ProofGateConfig) -> ProofGateResult<Self> {
        config.validate()?;
        let writer = match &config.chain.path {
            Some(path) => {
                let store = Arc::new(JsonlChainStore::open(path).await?);
                ChainWriter::open(store).await?
            }
            None => ChainWriter::in_memory(),
        };
        Self::with_writer(config, Arc::new(writer))
    }

    /// Build over an already opened chain writer.
    pub fn with_writer(config: &ProofGateConfig, writer: Arc<ChainWriter>) -> ProofGateResult<Self> {
        config.validate()?;
        let verifier = ProofVerifier::new(config.verification.clone())?;
        let emitter =
            AttestationEmitter::new(writer, config.chain.authority).with_verifier(verifier.clone());

        Ok(Self {
            simulator: CausalSimulator::new(config.simulation.clone())?,
            detector: InevitabilityDetector::new(),
            assembler: ProofAssembler::new(),
            reducer: ProofReducer::new(config.reduction.clone())?,
            verifier,
            emitter,
            registry: AuthorityRegistry::bootstrap(),
            violations: Mutex::new(Ledger::new("violations")),
        })
    }

    pub fn with_registry(mut self, registry: AuthorityRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn AttestationSink>) -> Self {
        self.emitter = self.emitter.with_sink(sink);
        self
    }

    pub fn registry(&self) -> &AuthorityRegistry {
        &self.registry
    }

    /// Simulate every intervention plus the baseline and classify the result.
    pub fn simulate(
        &self,
        state: &StateSnapshot,
        interventions: &[Intervention],
    ) -> ProofGateResult<(Vec<CausalPath>, InevitabilityProof)> {
        let paths = self.simulator.simulate(state, interventions)?;
        let proof = self.detector.classify(&paths);
        debug!(
            paths = paths.len(),
            proof_type = %proof.proof_type,
            "simulation classified"
        );
        Ok((paths, proof))
    }

    /// The simulation layer's report for `state`.
    ///
    /// Blocks when collapse is inevitable. Each collapsing intervention is
    /// listed as a simulated violation whether or not the layer blocks.
    pub fn simulation_report(
        &self,
        state: &StateSnapshot,
        interventions: &[Intervention],
    ) -> ProofGateResult<LayerReport> {
        let (paths, proof) = self.simulate(state, interventions)?;
        let violations = paths
            .iter()
            .filter(|path| path.leads_to_collapse)
            .filter_map(|path| match &path.origin {
                PathOrigin::Intervention(id) => Some(SimulatedViolation::new(
                    id.clone(),
                    format!(
                        "collapses at step {}",
                        path.first_collapse_step().unwrap_or(path.steps())
                    ),
                )),
                PathOrigin::NoAction => None,
            })
            .collect();

        let blocked = proof.is_inevitable();
        let reason = proof.summary();
        Ok(LayerReport::simulation(blocked, reason, Some(proof), violations))
    }

    /// Run one decision through the whole pipeline.
    pub async fn decide(
        &self,
        run_id: &str,
        action: &[u8],
        layers: &[LayerReport],
    ) -> ProofGateResult<PipelineOutcome> {
        let assembled = self.assembler.assemble(run_id, action, layers)?;
        let proof = if self.reducer.needs_reduction(&assembled) {
            self.reducer.reduce(&assembled)
        } else {
            assembled
        };

        let report = self.verifier.verify(&proof);
        let attestation = self.emitter.emit(&proof).await?;

        if !proof.final_decision().is_allowed() {
            self.violations
                .lock()
                .record(ViolationEntry::from_proof(&proof))?;
        }

        info!(
            run_id,
            decision = %proof.final_decision(),
            reduced = proof.is_reduced(),
            index = attestation.entry.index,
            "decision attested"
        );
        Ok(PipelineOutcome {
            proof,
            report,
            attestation,
        })
    }

    /// Check a refutation of an attested decision by `refuter`.
    pub fn refute(&self, record: &AttestationRecord, refuter: AuthorityClass) -> RefutationDecision {
        RefutationValidator::new(&self.registry).validate_against(record, refuter)
    }

    pub fn violations(&self) -> Vec<LedgerRecord<ViolationEntry>> {
        self.violations.lock().records()
    }

    pub fn verify_violations(&self) -> ChainVerification {
        self.violations.lock().verify()
    }

    pub async fn verify_chain(&self) -> ChainVerification {
        self.emitter.verify_chain().await
    }

    pub fn emitter(&self) -> &AttestationEmitter {
        &self.emitter
    }
}
