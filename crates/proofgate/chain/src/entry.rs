use proofgate_types::{CanonicalEncoder, ContentHash};
use serde::{Deserialize, Serialize};

const ENTRY_DOMAIN: &str = "proofgate/log-entry/v1";

/// One link of the hash chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Zero-based position; contiguous across the chain.
    pub index: u64,
    /// Hash of the payload this entry anchors.
    pub payload_hash: ContentHash,
    /// Entry hash of the predecessor. `None` only at index 0.
    pub previous_hash: Option<ContentHash>,
    /// Hash over `(index, payload_hash, previous_hash)`.
    pub entry_hash: ContentHash,
}

impl LogEntry {
    /// Compute the entry hash for the given link fields.
    pub fn compute_hash(
        index: u64,
        payload_hash: &ContentHash,
        previous_hash: Option<&ContentHash>,
    ) -> ContentHash {
        let mut enc = CanonicalEncoder::new(ENTRY_DOMAIN);
        enc.u64(1, index)
            .hash(2, payload_hash)
            .opt_hash(3, previous_hash);
        enc.digest()
    }

    /// Build a sealed entry.
    pub fn new(index: u64, payload_hash: ContentHash, previous_hash: Option<ContentHash>) -> Self {
        let entry_hash = Self::compute_hash(index, &payload_hash, previous_hash.as_ref());
        Self {
            index,
            payload_hash,
            previous_hash,
            entry_hash,
        }
    }

    pub fn recompute_hash(&self) -> ContentHash {
        Self::compute_hash(self.index, &self.payload_hash, self.previous_hash.as_ref())
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Whether the stored entry hash matches the link fields.
    pub fn is_sealed(&self) -> bool {
        self.recompute_hash() == self.entry_hash
    }
}
