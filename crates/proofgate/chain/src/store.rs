//! Persistence for chain entries.
//!
//! Stores are append-only. [`JsonlChainStore`] writes one JSON entry per
//! line and flushes + syncs before acknowledging, so an acknowledged
//! append survives a crash.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::entry::LogEntry;
use crate::error::{ChainError, ChainResult};
use crate::verify::verify_entries;

/// Append-only backing store for a hash chain.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Durably append one entry. Returns only after the entry is persisted.
    async fn append(&self, entry: &LogEntry) -> ChainResult<()>;

    /// Load every persisted entry in append order.
    async fn load(&self) -> ChainResult<Vec<LogEntry>>;

    /// Wipe all persisted entries. Test-only.
    #[cfg(any(test, feature = "test-support"))]
    async fn clear(&self) -> ChainResult<()>;
}

// ── Memory ─────────────────────────────────────────────────────────────

/// In-memory store for tests and embedding hosts without persistence.
#[derive(Default)]
pub struct MemoryChainStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl MemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl ChainStore for MemoryChainStore {
    async fn append(&self, entry: &LogEntry) -> ChainResult<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn load(&self) -> ChainResult<Vec<LogEntry>> {
        Ok(self.entries.read().clone())
    }

    #[cfg(any(test, feature = "test-support"))]
    async fn clear(&self) -> ChainResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

// ── JSONL file ─────────────────────────────────────────────────────────

/// File-backed store: one JSON-encoded [`LogEntry`] per line.
pub struct JsonlChainStore {
    path: PathBuf,
}

impl JsonlChainStore {
    /// Open (or prepare) a chain file.
    ///
    /// An existing file must verify as an intact chain; a corrupt file is
    /// refused rather than appended to.
    pub async fn open(path: impl Into<PathBuf>) -> ChainResult<Self> {
        let path = path.into();
        let store = Self { path };

        if tokio::fs::try_exists(&store.path).await? {
            let entries = store.load().await?;
            let report = verify_entries(&entries);
            if !report.chain_intact {
                return Err(ChainError::CorruptStore {
                    path: store.path.clone(),
                    issues: report.issues.len(),
                });
            }
            info!(
                path = %store.path.display(),
                entries = entries.len(),
                "resumed chain store"
            );
        } else if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChainStore for JsonlChainStore {
    async fn append(&self, entry: &LogEntry) -> ChainResult<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        debug!(index = entry.index, path = %self.path.display(), "chain entry persisted");
        Ok(())
    }

    async fn load(&self) -> ChainResult<Vec<LogEntry>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut entries = Vec::new();
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LogEntry =
                serde_json::from_str(&line).map_err(|e| ChainError::MalformedLine {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    #[cfg(any(test, feature = "test-support"))]
    async fn clear(&self) -> ChainResult<()> {
        if tokio::fs::try_exists(&self.path).await? {
            tokio::fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}
