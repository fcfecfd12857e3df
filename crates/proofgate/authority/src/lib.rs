//! # proofgate-authority
//!
//! The authority hierarchy and the refutation validator.
//!
//! Four ranked classes (`USER < PROJECT < CONSTITUTIONAL < SYSTEM_ROOT`)
//! are bootstrapped once into an immutable [`AuthorityRegistry`]. The
//! registry is passed by reference to whoever needs it; [`RegistryCell`]
//! guards hosts that keep one process-wide instance against double
//! bootstrap and fails fast on access before bootstrap.
//!
//! A refutation of an accepted proof is authorized only when **all** hold:
//!
//! 1. the invariant's supremacy level is not 1 (absolute, not relative);
//! 2. `level(refuter) >= level(refuted)`;
//! 3. the refuter is in the invariant's allowed-refuter set.
//!
//! Any failure is a **hard abort**: the caller must stop the action, not
//! degrade gracefully.

#![deny(unsafe_code)]

pub mod error;
pub mod refutation;
pub mod registry;

pub use error::{AuthorityError, AuthorityResult};
pub use refutation::{
    Attested, RefutationCheck, RefutationDecision, RefutationRequest, RefutationValidator,
};
pub use registry::{AuthorityEntry, AuthorityRegistry, RegistryBuilder, RegistryCell};
