//! # ProofGate
//!
//! Deterministic decision proofs for an AI-agent action gate.
//!
//! Upstream layers (temporal budget, entropy, intent, necessity, forward
//! simulation) each report a verdict on a proposed action. ProofGate turns
//! those verdicts into one immutable, content-hashed [`DecisionProof`],
//! minimizes it when it grows too large, verifies it, and anchors it in a
//! tamper-evident attestation chain.
//!
//! ```text
//!   LayerReport* ──► ProofAssembler ──► ProofReducer? ──► ProofVerifier
//!        ▲                                                    │
//!        │                                                    ▼
//!  CausalSimulator ─► InevitabilityDetector       AttestationEmitter ─► ChainWriter
//!                                                             │
//!                                                      AttestationSink*
//! ```
//!
//! ## Crates
//!
//! | Crate                   | Concern                                              |
//! |-------------------------|------------------------------------------------------|
//! | `proofgate-types`       | Hashes, canonical encoding, taxonomy, authority      |
//! | `proofgate-chain`       | Append-only hash chain, stores, typed ledgers        |
//! | `proofgate-authority`   | Authority registry and refutation validation         |
//! | `proofgate-simulation`  | Forward causal simulation and inevitability proofs   |
//! | `proofgate-proof`       | Proof assembly, reduction, hashing and verification  |
//! | `proofgate-attestation` | Attestation emission and side channels               |
//!
//! This crate re-exports all of them and adds [`ProofGateConfig`],
//! [`telemetry::init_tracing`] and the [`DecisionPipeline`] facade.
//!
//! ## Decisions
//!
//! | Decision              | When                                                   |
//! |-----------------------|--------------------------------------------------------|
//! | `ALLOW`               | no layer failed                                        |
//! | `BLOCK`               | a layer failed without a gate signal                   |
//! | `READ_ONLY`           | a failing layer asked for read-only                    |
//! | `PERMANENT_READ_ONLY` | budget exhausted, or a failing layer signalled permanent |

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

pub use config::{ChainConfig, ProofGateConfig, TracingConfig};
pub use error::{ProofGateError, ProofGateResult};
pub use pipeline::{DecisionPipeline, PipelineOutcome, ViolationEntry, VIOLATION_DOMAIN};

pub use proofgate_attestation as attestation;
pub use proofgate_authority as authority;
pub use proofgate_chain as chain;
pub use proofgate_proof as proof;
pub use proofgate_simulation as simulation;
pub use proofgate_types as types;

pub use proofgate_attestation::{AttestationEmitter, AttestationRecord, AttestationSink};
pub use proofgate_authority::{AuthorityRegistry, RefutationDecision, RefutationValidator};
pub use proofgate_proof::{DecisionProof, LayerReport, VerificationReport};
pub use proofgate_simulation::{InevitabilityProof, Intervention, StateSnapshot};
pub use proofgate_types::{AuthorityClass, ContentHash, FinalDecision, InvariantCategory, Phase};
