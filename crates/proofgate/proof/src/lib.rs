//! # proofgate-proof
//!
//! Turns the verdicts of independent upstream layers into one immutable,
//! hash-verifiable [`DecisionProof`].
//!
//! ```text
//!  LayerReport* ──► ProofAssembler ──► DecisionProof ──► ProofReducer ──► ProofVerifier
//!                        │                  (sealed)        (optional)        │
//!                 classify_reason                                      VerificationReport
//! ```
//!
//! ## Decisions
//!
//! | Condition                                                  | Decision              |
//! |------------------------------------------------------------|-----------------------|
//! | no violations                                              | `ALLOW`               |
//! | budget exhausted, or any permanent gate signal             | `PERMANENT_READ_ONLY` |
//! | any read-only gate signal                                  | `READ_ONLY`           |
//! | any other violation                                        | `BLOCK`               |
//!
//! A proof is sealed once: its fields are crate-private and its hash is
//! BLAKE3 over the canonical encoding of every other field. Reduction
//! never edits a proof in place; it seals a new one under a separate
//! domain tag.

#![deny(unsafe_code)]

pub mod assembler;
pub mod classify;
pub mod error;
pub mod layer;
pub mod proof;
pub mod reducer;
pub mod verifier;

pub use assembler::{resolve_category, ProofAssembler, Violation};
pub use classify::{classify_reason, REASON_MARKERS};
pub use error::{ProofError, ProofResult};
pub use layer::{BudgetSnapshot, EntropyReading, GateSignal, LayerReport, SimulatedViolation};
pub use proof::{
    CausalLink, ContractSnapshot, DecisionProof, EntropySnapshot, ProofDraft, PROOF_DOMAIN,
    REDUCED_PROOF_DOMAIN,
};
pub use reducer::{ProofReducer, ReductionConfig, DEFAULT_STOP_WORDS};
pub use verifier::{
    ProofVerifier, VerificationCheck, VerificationConfig, VerificationError, VerificationReport,
};
