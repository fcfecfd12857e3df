//! Side channels told about attestations after they are anchored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::error::AttestationResult;
use crate::record::AttestationRecord;

/// A best-effort consumer of anchored attestations.
#[async_trait]
pub trait AttestationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn publish(&self, record: &AttestationRecord) -> AttestationResult<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl AttestationSink for NoopSink {
    fn name(&self) -> &str {
        "noop"
    }

    async fn publish(&self, _record: &AttestationRecord) -> AttestationResult<()> {
        Ok(())
    }
}

/// Keeps every record it was given.
pub struct MemorySink {
    records: RwLock<Vec<AttestationRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<AttestationRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttestationSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn publish(&self, record: &AttestationRecord) -> AttestationResult<()> {
        self.records.write().push(record.clone());
        Ok(())
    }
}

/// Appends each record as one JSON line.
pub struct JsonlAttestationSink {
    path: PathBuf,
}

impl JsonlAttestationSink {
    pub async fn open(path: impl Into<PathBuf>) -> AttestationResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file.
    pub async fn load(&self) -> AttestationResult<Vec<AttestationRecord>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut records = Vec::new();
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            records.push(serde_json::from_str::<AttestationRecord>(line)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl AttestationSink for JsonlAttestationSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn publish(&self, record: &AttestationRecord) -> AttestationResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Publish to every sink in order. Failures are logged and counted,
/// never propagated.
pub(crate) async fn fan_out(sinks: &[Arc<dyn AttestationSink>], record: &AttestationRecord) -> usize {
    let mut failures = 0;
    for sink in sinks {
        if let Err(err) = sink.publish(record).await {
            failures += 1;
            warn!(
                sink = sink.name(),
                attestation_id = %record.attestation_id,
                error = %err,
                "attestation side channel failed"
            );
        }
    }
    failures
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AttestationError;
    use crate::record::AttestationPayload;
    use proofgate_chain::{ChainPayload, LogEntry};
    use proofgate_proof::{LayerReport, ProofAssembler};
    use proofgate_types::AuthorityClass;

    /// Always fails.
    pub(crate) struct FailingSink;

    #[async_trait]
    impl AttestationSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        async fn publish(&self, _record: &AttestationRecord) -> AttestationResult<()> {
            Err(AttestationError::Sink {
                sink: "failing".into(),
                reason: "unreachable endpoint".into(),
            })
        }
    }

    fn record(run_id: &str) -> AttestationRecord {
        let proof = ProofAssembler::new()
            .assemble(run_id, b"action", &[LayerReport::intent(true, "ok")])
            .unwrap();
        let payload = AttestationPayload::for_proof(&proof, AuthorityClass::User);
        let entry = LogEntry::new(0, payload.payload_hash(), None);
        AttestationRecord::new(payload, entry)
    }

    #[tokio::test]
    async fn memory_sink_records() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.publish(&record("r1")).await.unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].run_id, "r1");
    }

    #[tokio::test]
    async fn fan_out_continues_past_failures() {
        let memory = Arc::new(MemorySink::new());
        let sinks: Vec<Arc<dyn AttestationSink>> =
            vec![Arc::new(FailingSink), Arc::new(NoopSink), memory.clone()];

        let failures = fan_out(&sinks, &record("r2")).await;
        assert_eq!(failures, 1);
        assert_eq!(memory.len(), 1);
    }

    #[tokio::test]
    async fn jsonl_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAttestationSink::open(dir.path().join("out/attestations.jsonl"))
            .await
            .unwrap();

        sink.publish(&record("a")).await.unwrap();
        sink.publish(&record("b")).await.unwrap();

        let loaded = sink.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].run_id, "b");
        assert!(loaded.iter().all(AttestationRecord::is_anchored));
    }
}
