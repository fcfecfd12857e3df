use std::fmt;

use serde::{Deserialize, Serialize};

use crate::authority::AuthorityClass;

/// Closed taxonomy of invariant violations.
///
/// Every category carries:
/// - a **priority** (lower = more important), unique per category, used
///   to pick the single primary violation when several fire at once;
/// - a **supremacy level** (1 = absolutely unrefutable);
/// - a **minimum refuter** class for supremacy levels above 1.
///
/// `None` marks a proof with no violation (an ALLOW decision).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvariantCategory {
    /// Temporal budget fully consumed.
    BudgetExhausted,
    /// Forward simulation proves every path collapses.
    InevitableCollapse,
    /// Entropy phase reached COLLAPSING or DEAD.
    EntropyCollapse,
    /// Action cannot be undone.
    IrreversibleAction,
    /// Action diverges from the declared intent.
    IntentDrift,
    /// Action is not necessary for the declared goal.
    UnnecessaryAction,
    /// Requirement survival rate fell below threshold.
    RequirementLoss,
    /// Entropy above threshold without collapse.
    EntropyThreshold,
    /// Fallback for reasons no marker recognizes.
    GenericViolation,
    /// No violation.
    None,
}

/// Categories for which a PERMANENT_READ_ONLY decision is well formed.
pub const PERMANENT_READ_ONLY_CATEGORIES: [InvariantCategory; 3] = [
    InvariantCategory::BudgetExhausted,
    InvariantCategory::InevitableCollapse,
    InvariantCategory::EntropyCollapse,
];

impl InvariantCategory {
    /// Every violation category, in priority order (excludes `None`).
    pub const VIOLATIONS: [InvariantCategory; 9] = [
        InvariantCategory::BudgetExhausted,
        InvariantCategory::InevitableCollapse,
        InvariantCategory::EntropyCollapse,
        InvariantCategory::IrreversibleAction,
        InvariantCategory::IntentDrift,
        InvariantCategory::UnnecessaryAction,
        InvariantCategory::RequirementLoss,
        InvariantCategory::EntropyThreshold,
        InvariantCategory::GenericViolation,
    ];

    pub fn priority(&self) -> u8 {
        match self {
            Self::BudgetExhausted => 1,
            Self::InevitableCollapse => 2,
            Self::EntropyCollapse => 3,
            Self::IrreversibleAction => 4,
            Self::IntentDrift => 5,
            Self::UnnecessaryAction => 6,
            Self::RequirementLoss => 7,
            Self::EntropyThreshold => 8,
            Self::GenericViolation => 9,
            Self::None => u8::MAX,
        }
    }

    pub fn supremacy(&self) -> u8 {
        match self {
            Self::BudgetExhausted | Self::InevitableCollapse => 1,
            Self::EntropyCollapse | Self::IrreversibleAction => 2,
            Self::IntentDrift | Self::UnnecessaryAction | Self::RequirementLoss => 3,
            Self::EntropyThreshold | Self::GenericViolation | Self::None => 4,
        }
    }

    /// Lowest authority that may ever refute this category.
    /// `None` for supremacy-1 categories: nobody may.
    pub fn minimum_refuter(&self) -> Option<AuthorityClass> {
        match self.supremacy() {
            1 => None,
            2 => Some(AuthorityClass::Constitutional),
            3 => Some(AuthorityClass::Project),
            _ => Some(AuthorityClass::User),
        }
    }

    /// Authority classes allowed to refute this category.
    pub fn allowed_refuters(&self) -> Vec<AuthorityClass> {
        match self.minimum_refuter() {
            None => Vec::new(),
            Some(min) => AuthorityClass::ALL
                .iter()
                .copied()
                .filter(|c| *c >= min)
                .collect(),
        }
    }

    pub fn is_unrefutable(&self) -> bool {
        self.supremacy() == 1
    }

    pub fn is_violation(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn permits_permanent_read_only(&self) -> bool {
        PERMANENT_READ_ONLY_CATEGORIES.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExhausted => "BUDGET_EXHAUSTED",
            Self::InevitableCollapse => "INEVITABLE_COLLAPSE",
            Self::EntropyCollapse => "ENTROPY_COLLAPSE",
            Self::IrreversibleAction => "IRREVERSIBLE_ACTION",
            Self::IntentDrift => "INTENT_DRIFT",
            Self::UnnecessaryAction => "UNNECESSARY_ACTION",
            Self::RequirementLoss => "REQUIREMENT_LOSS",
            Self::EntropyThreshold => "ENTROPY_THRESHOLD",
            Self::GenericViolation => "GENERIC_VIOLATION",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for InvariantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
