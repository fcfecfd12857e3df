//! # proofgate-types
//!
//! Shared vocabulary for the ProofGate decision core.
//!
//! Every other ProofGate crate speaks in these types:
//!
//! - [`ContentHash`]: BLAKE3 content address, serialized as 64 lowercase hex chars
//! - [`CanonicalEncoder`]: explicit, field-ordered byte encoding used for every hash
//! - [`AuthorityClass`]: the four ranked authority classes
//! - [`InvariantCategory`]: the closed violation taxonomy with supremacy and priority
//! - [`FinalDecision`] / [`Phase`]: gate outcomes and entropy phases
//!
//! ## Supremacy
//!
//! | Supremacy | Meaning                                            |
//! |-----------|----------------------------------------------------|
//! | 1         | Unrefutable by any authority, including SystemRoot |
//! | 2         | Refutable by Constitutional and above              |
//! | 3         | Refutable by Project and above                     |
//! | 4         | Refutable by any authority                         |

#![deny(unsafe_code)]

pub mod authority;
pub mod canonical;
pub mod decision;
pub mod error;
pub mod hash;
pub mod invariant;

pub use authority::AuthorityClass;
pub use canonical::CanonicalEncoder;
pub use decision::{FinalDecision, Phase};
pub use error::{TypesError, TypesResult};
pub use hash::ContentHash;
pub use invariant::{InvariantCategory, PERMANENT_READ_ONLY_CATEGORIES};
