use chrono::{DateTime, SecondsFormat, Utc};
use proofgate_authority::Attested;
use proofgate_chain::{ChainPayload, LogEntry};
use proofgate_proof::DecisionProof;
use proofgate_types::{AuthorityClass, CanonicalEncoder, ContentHash, FinalDecision, InvariantCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ATTESTATION_DOMAIN: &str = "proofgate/attestation/v1";

/// The hashed part of an attestation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationPayload {
    pub attestation_id: Uuid,
    pub proof_hash: ContentHash,
    pub run_id: String,
    pub decision: FinalDecision,
    pub primary_invariant: InvariantCategory,
    pub authority: AuthorityClass,
    pub attested_at: DateTime<Utc>,
}

impl AttestationPayload {
    pub fn for_proof(proof: &DecisionProof, authority: AuthorityClass) -> Self {
        Self {
            attestation_id: Uuid::new_v4(),
            proof_hash: *proof.hash(),
            run_id: proof.run_id().to_string(),
            decision: proof.final_decision(),
            primary_invariant: proof.primary_invariant(),
            authority,
            attested_at: Utc::now(),
        }
    }
}

impl ChainPayload for AttestationPayload {
    fn domain(&self) -> &'static str {
        ATTESTATION_DOMAIN
    }

    fn encode_fields(&self, enc: &mut CanonicalEncoder) {
        enc.bytes(1, self.attestation_id.as_bytes())
            .hash(2, &self.proof_hash)
            .str(3, &self.run_id)
            .str(4, self.decision.as_str())
            .str(5, self.primary_invariant.as_str())
            .u64(6, u64::from(self.authority.level()))
            .str(
                7,
                &self
                    .attested_at
                    .to_rfc3339_opts(SecondsFormat::Nanos, true),
            );
    }
}

/// An attestation together with the chain entry that anchors it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub attestation_id: Uuid,
    pub proof_hash: ContentHash,
    pub run_id: String,
    pub decision: FinalDecision,
    pub primary_invariant: InvariantCategory,
    pub authority: AuthorityClass,
    pub attested_at: DateTime<Utc>,
    pub payload_hash: ContentHash,
    pub entry: LogEntry,
}

impl AttestationRecord {
    pub fn new(payload: AttestationPayload, entry: LogEntry) -> Self {
        Self {
            payload_hash: payload.payload_hash(),
            attestation_id: payload.attestation_id,
            proof_hash: payload.proof_hash,
            run_id: payload.run_id,
            decision: payload.decision,
            primary_invariant: payload.primary_invariant,
            authority: payload.authority,
            attested_at: payload.attested_at,
            entry,
        }
    }

    pub fn payload(&self) -> AttestationPayload {
        AttestationPayload {
            attestation_id: self.attestation_id,
            proof_hash: self.proof_hash,
            run_id: self.run_id.clone(),
            decision: self.decision,
            primary_invariant: self.primary_invariant,
            authority: self.authority,
            attested_at: self.attested_at,
        }
    }

    /// Whether the record's fields still hash to the value its entry anchors.
    pub fn is_anchored(&self) -> bool {
        let computed = self.payload().payload_hash();
        computed == self.payload_hash
            && self.entry.payload_hash == self.payload_hash
            && self.entry.recompute_hash() == self.entry.entry_hash
    }

    /// Whether this record attests `proof`.
    pub fn attests(&self, proof: &DecisionProof) -> bool {
        self.proof_hash == *proof.hash()
    }
}

impl Attested for AttestationRecord {
    fn attesting_authority(&self) -> AuthorityClass {
        self.authority
    }

    fn attested_invariant(&self) -> InvariantCategory {
        self.primary_invariant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofgate_proof::{LayerReport, ProofAssembler};

    fn proof() -> DecisionProof {
        ProofAssembler::new()
            .assemble("run-7", b"drop table", &[LayerReport::intent(false, "intent mismatch")])
            .unwrap()
    }

    #[test]
    fn record_anchors_payload() {
        let proof = proof();
        let payload = AttestationPayload::for_proof(&proof, AuthorityClass::Project);
        let entry = LogEntry::new(0, payload.payload_hash(), None);
        let record = AttestationRecord::new(payload, entry);

        assert!(record.is_anchored());
        assert!(record.attests(&proof));
        assert_eq!(record.attested_invariant(), InvariantCategory::IntentDrift);
        assert_eq!(record.attesting_authority(), AuthorityClass::Project);
    }

    #[test]
    fn edited_record_is_no_longer_anchored() {
        let payload = AttestationPayload::for_proof(&proof(), AuthorityClass::User);
        let entry = LogEntry::new(0, payload.payload_hash(), None);
        let mut record = AttestationRecord::new(payload, entry);
        record.authority = AuthorityClass::SystemRoot;
        assert!(!record.is_anchored());
    }

    #[test]
    fn record_survives_json() {
        let payload = AttestationPayload::for_proof(&proof(), AuthorityClass::User);
        let entry = LogEntry::new(0, payload.payload_hash(), None);
        let record = AttestationRecord::new(payload, entry);

        let json = serde_json::to_string(&record).unwrap();
        let back: AttestationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.is_anchored());
    }
}
