use std::fmt;

use proofgate_types::Phase;
use serde::{Deserialize, Serialize};

use crate::state::StateSnapshot;

/// Where a causal path starts from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PathOrigin {
    Intervention(String),
    NoAction,
}

impl PathOrigin {
    pub fn is_baseline(&self) -> bool {
        matches!(self, Self::NoAction)
    }
}

impl fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intervention(id) => write!(f, "intervention:{id}"),
            Self::NoAction => f.write_str("no_action"),
        }
    }
}

/// One simulated future.
///
/// Trajectories have `depth + 1` elements; index 0 is the initial state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CausalPath {
    pub origin: PathOrigin,
    pub entropy_trajectory: Vec<f64>,
    pub phase_trajectory: Vec<Phase>,
    pub size_trajectory: Vec<u32>,
    pub terminal: StateSnapshot,
    pub terminal_phase: Phase,
    pub leads_to_collapse: bool,
    pub monotonic_growth: bool,
}

impl CausalPath {
    /// Number of simulated steps (excludes the initial state).
    pub fn steps(&self) -> usize {
        self.phase_trajectory.len().saturating_sub(1)
    }

    /// First trajectory index whose phase is COLLAPSING or DEAD.
    pub fn first_collapse_step(&self) -> Option<usize> {
        self.phase_trajectory.iter().position(Phase::is_collapsed)
    }

    pub(crate) fn sizes_non_decreasing(sizes: &[u32]) -> bool {
        sizes.windows(2).all(|w| w[1] >= w[0])
    }
}
