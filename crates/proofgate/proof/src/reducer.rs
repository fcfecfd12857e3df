//! Proof minimization.
//!
//! `reduce` is idempotent: a reduced proof is already at the fixed point
//! of every normalization below, so reducing it again reproduces it
//! byte for byte (same hash).

use std::collections::HashSet;

use proofgate_types::ContentHash;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProofError, ProofResult};
use crate::proof::{CausalLink, DecisionProof};

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "to", "in", "on", "at", "for", "with", "by", "and", "or", "that",
    "this", "is", "are", "was", "were", "be", "been", "it", "its", "as", "from", "very", "just",
    "really", "basically", "actually",
];

const ELLIPSIS: &str = "...";

/// Limits a reduced proof must meet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    pub max_chain_links: usize,
    pub max_alternatives: usize,
    /// Character (not byte) limit, ellipsis included.
    pub max_description_chars: usize,
    pub stop_words: Vec<String>,
}

impl ReductionConfig {
    pub fn validate(&self) -> ProofResult<()> {
        if self.max_chain_links == 0 {
            return Err(ProofError::InvalidConfig(
                "max_chain_links must be at least 1".into(),
            ));
        }
        if self.max_alternatives == 0 {
            return Err(ProofError::InvalidConfig(
                "max_alternatives must be at least 1".into(),
            ));
        }
        if self.max_description_chars <= ELLIPSIS.len() {
            return Err(ProofError::InvalidConfig(format!(
                "max_description_chars must exceed {}",
                ELLIPSIS.len()
            )));
        }
        Ok(())
    }
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            max_chain_links: 3,
            max_alternatives: 10,
            max_description_chars: 100,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Minimizes proofs to their essential content.
#[derive(Clone, Debug)]
pub struct ProofReducer {
    config: ReductionConfig,
    stop_words: Option<Regex>,
}

impl ProofReducer {
    pub fn new(config: ReductionConfig) -> ProofResult<Self> {
        config.validate()?;
        let stop_words = if config.stop_words.is_empty() {
            None
        } else {
            let alternation = config
                .stop_words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?)
        };
        Ok(Self { config, stop_words })
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    pub fn needs_reduction(&self, proof: &DecisionProof) -> bool {
        proof.causal_chain.len() > self.config.max_chain_links
            || proof.forbidden_alternatives.len() > self.config.max_alternatives
            || has_duplicate_links(&proof.causal_chain)
            || proof.description.chars().count() > self.config.max_description_chars
    }

    /// Seal a minimized copy under the reduced domain tag.
    pub fn reduce(&self, proof: &DecisionProof) -> DecisionProof {
        let mut draft = proof.to_draft();
        draft.causal_chain = self.reduce_chain(&proof.causal_chain);
        draft.forbidden_alternatives = self.reduce_alternatives(&proof.forbidden_alternatives);
        draft.description = self.reduce_description(&proof.description);
        if draft.description.is_empty() {
            draft.description = proof.final_decision.as_str().to_string();
        }

        let reduced = draft.seal_as(true);
        debug!(
            run_id = %reduced.run_id,
            links_before = proof.causal_chain.len(),
            links_after = reduced.causal_chain.len(),
            hash = %reduced.hash.short(),
            "proof reduced"
        );
        reduced
    }

    fn reduce_chain(&self, chain: &[CausalLink]) -> Vec<CausalLink> {
        let mut seen = HashSet::new();
        let deduped: Vec<&CausalLink> = chain
            .iter()
            .filter(|link| seen.insert((link.layer.as_str(), link.event.as_str())))
            .collect();

        let mut kept: Vec<&CausalLink> = deduped
            .iter()
            .copied()
            .filter(|link| is_essential(link))
            .collect();

        let max = self.config.max_chain_links;
        if kept.len() > max {
            let last = kept[kept.len() - 1];
            kept.truncate(max - 1);
            kept.push(last);
        }
        if kept.is_empty() {
            if let Some(first) = deduped.first() {
                kept.push(*first);
            }
        }

        kept.into_iter()
            .enumerate()
            .map(|(i, link)| CausalLink {
                step: i as u32 + 1,
                ..link.clone()
            })
            .collect()
    }

    fn reduce_alternatives(&self, alternatives: &[ContentHash]) -> Vec<ContentHash> {
        let mut seen = HashSet::new();
        alternatives
            .iter()
            .copied()
            .filter(|hash| seen.insert(*hash))
            .take(self.config.max_alternatives)
            .collect()
    }

    /// Normalize until nothing changes.
    fn reduce_description(&self, description: &str) -> String {
        let mut current = description.to_string();
        loop {
            let next = self.normalize_description(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn normalize_description(&self, description: &str) -> String {
        let stripped = match &self.stop_words {
            Some(pattern) => pattern.replace_all(description, "").into_owned(),
            None => description.to_string(),
        };
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        let max = self.config.max_description_chars;
        if collapsed.chars().count() <= max {
            return collapsed;
        }
        let head: String = collapsed.chars().take(max - ELLIPSIS.len()).collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    }
}

fn has_duplicate_links(chain: &[CausalLink]) -> bool {
    let mut seen = HashSet::new();
    !chain
        .iter()
        .all(|link| seen.insert((link.layer.as_str(), link.event.as_str())))
}

fn is_essential(link: &CausalLink) -> bool {
    let event = link.event.to_lowercase();
    let effect = link.effect.to_lowercase();
    ["gate", "decision", "detected", "simulation"]
        .iter()
        .any(|marker| event.contains(marker))
        || effect.contains("permitted")
        || effect.contains("allow")
}
