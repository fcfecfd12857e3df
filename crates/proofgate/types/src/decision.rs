use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the decision gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalDecision {
    /// No violation; the action proceeds.
    Allow,
    /// The action is refused.
    Block,
    /// The system may observe but not act.
    ReadOnly,
    /// Read-only with no way back (budget exhausted, collapse proven).
    PermanentReadOnly,
}

impl FinalDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Block => "BLOCK",
            Self::ReadOnly => "READ_ONLY",
            Self::PermanentReadOnly => "PERMANENT_READ_ONLY",
        }
    }
}

impl fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entropy phase, ordered from healthiest to terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Stable,
    Drifting,
    Critical,
    Collapsing,
    Dead,
}

impl Phase {
    pub const DRIFTING_AT: f64 = 0.30;
    pub const CRITICAL_AT: f64 = 0.50;
    pub const COLLAPSING_AT: f64 = 0.70;
    pub const DEAD_AT: f64 = 0.85;

    /// Classify an entropy score in `[0, 1]`.
    pub fn classify(entropy: f64) -> Self {
        if entropy >= Self::DEAD_AT {
            Self::Dead
        } else if entropy >= Self::COLLAPSING_AT {
            Self::Collapsing
        } else if entropy >= Self::CRITICAL_AT {
            Self::Critical
        } else if entropy >= Self::DRIFTING_AT {
            Self::Drifting
        } else {
            Self::Stable
        }
    }

    /// COLLAPSING or DEAD.
    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Collapsing | Self::Dead)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::Drifting => "DRIFTING",
            Self::Critical => "CRITICAL",
            Self::Collapsing => "COLLAPSING",
            Self::Dead => "DEAD",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
