//! # proofgate-attestation
//!
//! Anchors verified decision proofs in the hash chain.
//!
//! ```text
//!  DecisionProof ──verify──► AttestationPayload ──hash──► ChainWriter::append
//!                   │                                          │
//!              (refuse if                               AttestationRecord
//!               invalid)                                       │
//!                                                 AttestationSink* (best effort)
//! ```
//!
//! The chain append is the point of record. Side-channel sinks are told
//! afterwards; a sink failure is logged and never undoes or fails the
//! attestation.

#![deny(unsafe_code)]

pub mod emitter;
pub mod error;
pub mod record;
pub mod sink;

pub use emitter::AttestationEmitter;
pub use error::{AttestationError, AttestationResult};
pub use record::{AttestationPayload, AttestationRecord, ATTESTATION_DOMAIN};
pub use sink::{AttestationSink, JsonlAttestationSink, MemorySink, NoopSink};
