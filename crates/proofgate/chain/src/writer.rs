use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use proofgate_types::ContentHash;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::chain::HashChain;
use crate::entry::LogEntry;
use crate::error::{ChainError, ChainResult};
use crate::store::{ChainStore, MemoryChainStore};
use crate::verify::ChainVerification;

/// Shared, single-writer front end over a [`ChainStore`].
///
/// The async mutex is held across the store write, so reading the tail,
/// computing the next link, persisting it and committing it in memory
/// happen as one step. Two concurrent appenders can never both link to
/// the same tail through this writer.
///
/// A failed store append is reconciled against what the store actually
/// holds. When that is impossible the writer is poisoned and refuses
/// further appends until it is reopened.
pub struct ChainWriter {
    chain: Mutex<HashChain>,
    store: Arc<dyn ChainStore>,
    poisoned: AtomicBool,
}

impl ChainWriter {
    /// Open a writer over `store`, resuming whatever it already holds.
    /// A persisted chain that fails verification is refused.
    pub async fn open(store: Arc<dyn ChainStore>) -> ChainResult<Self> {
        let entries = store.load().await?;
        let chain = HashChain::from_entries(entries)?;
        Ok(Self {
            chain: Mutex::new(chain),
            store,
            poisoned: AtomicBool::new(false),
        })
    }

    /// Writer over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            chain: Mutex::new(HashChain::new()),
            store: Arc::new(MemoryChainStore::new()),
            poisoned: AtomicBool::new(false),
        }
    }

    /// Append a payload hash. Acknowledged only after the store has persisted it.
    ///
    /// The store error is still returned when a failed append turns out to
    /// have landed; the entry is adopted so the next append links to it.
    pub async fn append(&self, payload_hash: ContentHash) -> ChainResult<LogEntry> {
        let mut chain = self.chain.lock().await;
        if self.is_poisoned() {
            return Err(ChainError::WriterPoisoned {
                reason: "an earlier append could not be reconciled".into(),
            });
        }

        let entry = chain.next_entry(payload_hash);
        if let Err(err) = self.store.append(&entry).await {
            self.reconcile(&mut chain, &entry).await;
            return Err(err);
        }
        let committed = chain.commit(entry)?.clone();

        info!(
            index = committed.index,
            payload_hash = %committed.payload_hash.short(),
            entry_hash = %committed.entry_hash.short(),
            "chain append acknowledged"
        );
        Ok(committed)
    }

    /// Bring the in-memory tail back in line with the store after a failed append.
    async fn reconcile(&self, chain: &mut HashChain, entry: &LogEntry) {
        let persisted = match self.store.load().await {
            Ok(persisted) => persisted,
            Err(err) => {
                self.poison(entry.index, &err.to_string());
                return;
            }
        };

        let len = chain.len();
        if persisted.len() == len {
            warn!(index = entry.index, "chain append failed before persisting");
            return;
        }
        if persisted.len() == len + 1 && persisted[len] == *entry {
            match chain.commit(entry.clone()) {
                Ok(_) => warn!(
                    index = entry.index,
                    "chain append reported failure but persisted; entry adopted"
                ),
                Err(err) => self.poison(entry.index, &err.to_string()),
            }
            return;
        }
        self.poison(
            entry.index,
            &format!("store holds {} entries, writer holds {len}", persisted.len()),
        );
    }

    fn poison(&self, index: u64, reason: &str) {
        self.poisoned.store(true, Ordering::SeqCst);
        error!(index, reason, "chain writer poisoned");
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::SeqCst)
    }

    pub async fn entries(&self) -> Vec<LogEntry> {
        self.chain.lock().await.entries().to_vec()
    }

    pub async fn head_hash(&self) -> Option<ContentHash> {
        self.chain.lock().await.head_hash()
    }

    pub async fn len(&self) -> usize {
        self.chain.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chain.lock().await.is_empty()
    }

    pub async fn verify(&self) -> ChainVerification {
        self.chain.lock().await.verify()
    }

    /// Wipe the chain and its store. Test-only and always logged.
    #[cfg(any(test, feature = "test-support"))]
    pub async fn clear_for_testing(&self) -> ChainResult<()> {
        let mut chain = self.chain.lock().await;
        self.store.clear().await?;
        chain.clear_for_testing();
        self.poisoned.store(false, Ordering::SeqCst);
        Ok(())
    }
}
