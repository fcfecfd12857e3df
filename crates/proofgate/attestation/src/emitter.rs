use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use proofgate_chain::{ChainPayload, ChainVerification, ChainWriter};
use proofgate_proof::{DecisionProof, ProofVerifier};
use proofgate_types::AuthorityClass;
use tracing::{info, warn};

use crate::error::AttestationResult;
use crate::record::{AttestationPayload, AttestationRecord};
use crate::sink::{fan_out, AttestationSink};

/// Verifies proofs and anchors them in the attestation chain.
pub struct AttestationEmitter {
    writer: Arc<ChainWriter>,
    verifier: ProofVerifier,
    authority: AuthorityClass,
    sinks: Vec<Arc<dyn AttestationSink>>,
    failed_publishes: AtomicU64,
}

impl AttestationEmitter {
    pub fn new(writer: Arc<ChainWriter>, authority: AuthorityClass) -> Self {
        Self {
            writer,
            verifier: ProofVerifier::default(),
            authority,
            sinks: Vec::new(),
            failed_publishes: AtomicU64::new(0),
        }
    }

    pub fn with_verifier(mut self, verifier: ProofVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn AttestationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn authority(&self) -> AuthorityClass {
        self.authority
    }

    pub fn writer(&self) -> &Arc<ChainWriter> {
        &self.writer
    }

    /// Sink publishes that failed since this emitter was built.
    pub fn failed_publishes(&self) -> u64 {
        self.failed_publishes.load(Ordering::Relaxed)
    }

    /// Verify `proof`, append its attestation to the chain, then tell
    /// the side channels.
    ///
    /// An invalid or tampered proof is refused before anything is
    /// written. Sink failures do not affect the result.
    pub async fn emit(&self, proof: &DecisionProof) -> AttestationResult<AttestationRecord> {
        self.verifier.ensure_valid(proof)?;

        let payload = AttestationPayload::for_proof(proof, self.authority);
        let entry = self.writer.append(payload.payload_hash()).await?;
        let record = AttestationRecord::new(payload, entry);

        info!(
            run_id = %record.run_id,
            decision = %record.decision,
            primary_invariant = %record.primary_invariant,
            authority = %record.authority,
            proof_hash = %record.proof_hash.short(),
            index = record.entry.index,
            "attestation emitted"
        );

        let failed = fan_out(&self.sinks, &record).await;
        if failed > 0 {
            self.failed_publishes
                .fetch_add(failed as u64, Ordering::Relaxed);
            warn!(
                attestation_id = %record.attestation_id,
                failed,
                sinks = self.sinks.len(),
                "attestation emitted with failed side channels"
            );
        }
        Ok(record)
    }

    pub async fn verify_chain(&self) -> ChainVerification {
        self.writer.verify().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttestationError;
    use crate::sink::tests::FailingSink;
    use crate::sink::MemorySink;
    use proofgate_chain::JsonlChainStore;
    use proofgate_proof::{GateSignal, LayerReport, ProofAssembler, ProofError};
    use proofgate_types::{FinalDecision, InvariantCategory};

    fn blocked() -> DecisionProof {
        ProofAssembler::new()
            .assemble(
                "run-1",
                b"rm -rf /",
                &[
                    LayerReport::intent(true, "aligned"),
                    LayerReport::necessity(false, "action not necessary"),
                ],
            )
            .unwrap()
    }

    fn collapsed() -> DecisionProof {
        ProofAssembler::new()
            .assemble(
                "run-2",
                b"deploy",
                &[LayerReport::entropy(false, "entropy collapse", None)
                    .with_gate_signal(GateSignal::Permanent)],
            )
            .unwrap()
    }

    #[tokio::test]
    async fn emits_and_anchors() {
        let emitter = AttestationEmitter::new(Arc::new(ChainWriter::in_memory()), AuthorityClass::Project);
        let proof = blocked();
        let record = emitter.emit(&proof).await.unwrap();

        assert_eq!(record.entry.index, 0);
        assert_eq!(record.decision, FinalDecision::Block);
        assert_eq!(record.primary_invariant, InvariantCategory::UnnecessaryAction);
        assert!(record.attests(&proof));
        assert!(record.is_anchored());

        let second = emitter.emit(&collapsed()).await.unwrap();
        assert_eq!(second.entry.previous_hash, Some(record.entry.entry_hash));
        assert_eq!(second.decision, FinalDecision::PermanentReadOnly);
        assert!(emitter.verify_chain().await.chain_intact);
    }

    #[tokio::test]
    async fn refuses_tampered_proof() {
        let emitter = AttestationEmitter::new(Arc::new(ChainWriter::in_memory()), AuthorityClass::User);
        let mut json = serde_json::to_value(blocked()).unwrap();
        json["description"] = serde_json::Value::String("nothing to see".into());
        let forged: DecisionProof = serde_json::from_value(json).unwrap();

        let err = emitter.emit(&forged).await.unwrap_err();
        assert!(matches!(err, AttestationError::Rejected(ProofError::Tampered { .. })));
        assert!(emitter.writer().is_empty().await);
    }

    #[tokio::test]
    async fn sink_failures_do_not_fail_emission() {
        let memory = Arc::new(MemorySink::new());
        let emitter = AttestationEmitter::new(Arc::new(ChainWriter::in_memory()), AuthorityClass::User)
            .with_sink(Arc::new(FailingSink))
            .with_sink(memory.clone());

        let record = emitter.emit(&blocked()).await.unwrap();
        assert_eq!(memory.records(), vec![record]);
        assert_eq!(emitter.writer().len().await, 1);
        assert_eq!(emitter.failed_publishes(), 1);

        emitter.emit(&blocked()).await.unwrap();
        assert_eq!(emitter.failed_publishes(), 2);
        assert_eq!(memory.len(), 2);
    }

    #[tokio::test]
    async fn persisted_chain_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attestations.chain.jsonl");

        let first = {
            let store = Arc::new(JsonlChainStore::open(&path).await.unwrap());
            let writer = Arc::new(ChainWriter::open(store).await.unwrap());
            AttestationEmitter::new(writer, AuthorityClass::SystemRoot)
                .emit(&blocked())
                .await
                .unwrap()
        };

        let store = Arc::new(JsonlChainStore::open(&path).await.unwrap());
        let writer = Arc::new(ChainWriter::open(store).await.unwrap());
        let emitter = AttestationEmitter::new(writer, AuthorityClass::SystemRoot);
        let second = emitter.emit(&collapsed()).await.unwrap();

        assert_eq!(second.entry.index, 1);
        assert_eq!(second.entry.previous_hash, Some(first.entry.entry_hash));
        assert!(emitter.verify_chain().await.chain_intact);
    }
}
