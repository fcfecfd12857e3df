use std::fmt;

use proofgate_types::{AuthorityClass, InvariantCategory};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AuthorityError, AuthorityResult};
use crate::registry::AuthorityRegistry;

/// An attempt to overturn an accepted proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefutationRequest {
    /// Authority attempting the refutation.
    pub refuter: AuthorityClass,
    /// Authority that accepted the proof being refuted.
    pub refuted: AuthorityClass,
    /// Primary invariant of the refuted proof.
    pub invariant: InvariantCategory,
}

impl RefutationRequest {
    pub fn new(
        refuter: AuthorityClass,
        refuted: AuthorityClass,
        invariant: InvariantCategory,
    ) -> Self {
        Self {
            refuter,
            refuted,
            invariant,
        }
    }
}

/// Something already attested that can be targeted by a refutation.
pub trait Attested {
    /// Authority under which the decision was attested.
    fn attesting_authority(&self) -> AuthorityClass;
    /// Primary invariant of the attested decision.
    fn attested_invariant(&self) -> InvariantCategory;
}

/// One failed authorization check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum RefutationCheck {
    /// Invariant has supremacy level 1.
    SupremacyAbsolute { invariant: InvariantCategory },
    /// Refuter ranks below the refuted authority.
    InsufficientLevel { refuter_level: u8, refuted_level: u8 },
    /// Refuter is outside the invariant's allowed-refuter set.
    RefuterNotAllowed {
        refuter: AuthorityClass,
        invariant: InvariantCategory,
    },
}

impl fmt::Display for RefutationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SupremacyAbsolute { invariant } => {
                write!(f, "{invariant} has supremacy 1 and accepts no refuter")
            }
            Self::InsufficientLevel {
                refuter_level,
                refuted_level,
            } => write!(
                f,
                "refuter level {refuter_level} is below refuted level {refuted_level}"
            ),
            Self::RefuterNotAllowed { refuter, invariant } => {
                write!(f, "{refuter} may not refute {invariant}")
            }
        }
    }
}

/// Outcome of [`RefutationValidator::validate`].
///
/// `hard_abort` is always `!authorized`: a failed refutation stops the
/// action outright.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefutationDecision {
    pub authorized: bool,
    pub hard_abort: bool,
    pub reason: String,
    pub failed_checks: Vec<RefutationCheck>,
}

impl RefutationDecision {
    fn authorized(request: &RefutationRequest) -> Self {
        Self {
            authorized: true,
            hard_abort: false,
            reason: format!(
                "{} may refute {} on {}",
                request.refuter, request.refuted, request.invariant
            ),
            failed_checks: Vec::new(),
        }
    }

    fn aborted(failed_checks: Vec<RefutationCheck>) -> Self {
        let reason = failed_checks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            authorized: false,
            hard_abort: true,
            reason,
            failed_checks,
        }
    }
}

/// Validates refutations against a frozen [`AuthorityRegistry`].
#[derive(Clone, Copy, Debug)]
pub struct RefutationValidator<'a> {
    registry: &'a AuthorityRegistry,
}

impl<'a> RefutationValidator<'a> {
    pub fn new(registry: &'a AuthorityRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate every check; all failures are reported together.
    pub fn validate(&self, request: &RefutationRequest) -> RefutationDecision {
        let mut failed = Vec::new();

        if request.invariant.is_unrefutable() {
            failed.push(RefutationCheck::SupremacyAbsolute {
                invariant: request.invariant,
            });
        }

        let refuter_level = self.registry.level(request.refuter);
        let refuted_level = self.registry.level(request.refuted);
        if !self
            .registry
            .outranks_or_equals(request.refuter, request.refuted)
        {
            failed.push(RefutationCheck::InsufficientLevel {
                refuter_level,
                refuted_level,
            });
        }

        if !self
            .registry
            .allowed_refuters(request.invariant)
            .contains(&request.refuter)
        {
            failed.push(RefutationCheck::RefuterNotAllowed {
                refuter: request.refuter,
                invariant: request.invariant,
            });
        }

        if failed.is_empty() {
            debug!(
                refuter = %request.refuter,
                refuted = %request.refuted,
                invariant = %request.invariant,
                "refutation authorized"
            );
            RefutationDecision::authorized(request)
        } else {
            let decision = RefutationDecision::aborted(failed);
            warn!(
                refuter = %request.refuter,
                refuted = %request.refuted,
                invariant = %request.invariant,
                reason = %decision.reason,
                "refutation hard abort"
            );
            decision
        }
    }

    /// Like [`validate`](Self::validate) but turns a hard abort into an error.
    pub fn enforce(&self, request: &RefutationRequest) -> AuthorityResult<RefutationDecision> {
        let decision = self.validate(request);
        if decision.hard_abort {
            return Err(AuthorityError::RefutationAborted {
                reason: decision.reason,
            });
        }
        Ok(decision)
    }

    /// Validate a refutation of something already attested.
    pub fn validate_against<A: Attested + ?Sized>(
        &self,
        attested: &A,
        refuter: AuthorityClass,
    ) -> RefutationDecision {
        self.validate(&RefutationRequest::new(
            refuter,
            attested.attesting_authority(),
            attested.attested_invariant(),
        ))
    }
}
