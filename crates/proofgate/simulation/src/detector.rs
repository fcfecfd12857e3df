use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::path::{CausalPath, PathOrigin};

/// How inevitability was (or was not) established.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofType {
    AllPathsCollapse,
    MccsMonotonicGrowth,
    NotInevitable,
}

impl ProofType {
    pub fn is_inevitable(&self) -> bool {
        !matches!(self, Self::NotInevitable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllPathsCollapse => "ALL_PATHS_COLLAPSE",
            Self::MccsMonotonicGrowth => "MCCS_MONOTONIC_GROWTH",
            Self::NotInevitable => "NOT_INEVITABLE",
        }
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The quickest route to collapse among the collapsing paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastestCollapse {
    pub origin: PathOrigin,
    /// Trajectory index at which the phase first reached COLLAPSING or DEAD.
    pub steps_to_collapse: usize,
}

/// Classification of a path set.
///
/// `confidence` is `Some(1.0)` exactly when the proof is inevitable; the
/// classification is binary, never an estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InevitabilityProof {
    pub proof_type: ProofType,
    pub total_paths: usize,
    pub collapsing_paths: usize,
    pub confidence: Option<f64>,
    pub fastest_collapse: Option<FastestCollapse>,
}

impl InevitabilityProof {
    pub fn is_inevitable(&self) -> bool {
        self.proof_type.is_inevitable()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {}/{} paths collapse",
            self.proof_type, self.collapsing_paths, self.total_paths
        );
        if let Some(fastest) = &self.fastest_collapse {
            out.push_str(&format!(
                ", fastest via {} at step {}",
                fastest.origin, fastest.steps_to_collapse
            ));
        }
        out
    }
}

/// Classifies simulated paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct InevitabilityDetector;

impl InevitabilityDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, paths: &[CausalPath]) -> InevitabilityProof {
        let total_paths = paths.len();
        let collapsing_paths = paths.iter().filter(|p| p.leads_to_collapse).count();

        let proof_type = if paths.is_empty() {
            ProofType::NotInevitable
        } else if collapsing_paths == total_paths {
            ProofType::AllPathsCollapse
        } else if paths.iter().all(|p| p.monotonic_growth) {
            ProofType::MccsMonotonicGrowth
        } else {
            ProofType::NotInevitable
        };

        let (confidence, fastest_collapse) = if proof_type.is_inevitable() {
            (Some(1.0), fastest_collapse(paths))
        } else {
            (None, None)
        };

        debug!(
            proof_type = %proof_type,
            total_paths,
            collapsing_paths,
            "inevitability classified"
        );

        InevitabilityProof {
            proof_type,
            total_paths,
            collapsing_paths,
            confidence,
            fastest_collapse,
        }
    }
}

/// Minimum first-collapse index across collapsing paths; ties keep the
/// earlier path.
fn fastest_collapse(paths: &[CausalPath]) -> Option<FastestCollapse> {
    let mut best: Option<FastestCollapse> = None;
    for path in paths.iter().filter(|p| p.leads_to_collapse) {
        let Some(step) = path.first_collapse_step() else {
            continue;
        };
        if best.as_ref().map_or(true, |b| step < b.steps_to_collapse) {
            best = Some(FastestCollapse {
                origin: path.origin.clone(),
                steps_to_collapse: step,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::CausalSimulator;
    use crate::state::{Intervention, StateSnapshot};
    use proofgate_types::Phase;
    use proptest::prelude::*;

    fn path(origin: PathOrigin, phases: Vec<Phase>, sizes: Vec<u32>) -> CausalPath {
        let terminal_phase = *phases.last().unwrap();
        let monotonic_growth = CausalPath::sizes_non_decreasing(&sizes);
        CausalPath {
            origin,
            entropy_trajectory: vec![0.0; phases.len()],
            phase_trajectory: phases,
            size_trajectory: sizes,
            terminal: StateSnapshot {
                entropy: 0.0,
                survival_ratio: 0.0,
                dead_elements: 0,
                singularities: 0,
                total_elements: 0,
            },
            terminal_phase,
            leads_to_collapse: terminal_phase.is_collapsed(),
            monotonic_growth,
        }
    }

    #[test]
    fn empty_path_set_is_not_inevitable() {
        let proof = InevitabilityDetector::new().classify(&[]);
        assert_eq!(proof.proof_type, ProofType::NotInevitable);
        assert_eq!(proof.confidence, None);
        assert_eq!(proof.fastest_collapse, None);
        assert_eq!(proof.total_paths, 0);
    }

    #[test]
    fn three_dead_paths_collapse_with_minimum_steps() {
        use Phase::*;
        let paths = vec![
            path(
                PathOrigin::Intervention("a".into()),
                vec![Critical, Critical, Critical, Dead],
                vec![1, 2, 3, 4],
            ),
            path(
                PathOrigin::Intervention("b".into()),
                vec![Critical, Collapsing, Dead, Dead],
                vec![1, 2, 1, 4],
            ),
            path(
                PathOrigin::NoAction,
                vec![Critical, Critical, Dead, Dead],
                vec![1, 3, 5, 7],
            ),
        ];
        let proof = InevitabilityDetector::new().classify(&paths);
        assert_eq!(proof.proof_type, ProofType::AllPathsCollapse);
        assert_eq!(proof.confidence, Some(1.0));
        assert_eq!(proof.collapsing_paths, 3);
        assert_eq!(
            proof.fastest_collapse,
            Some(FastestCollapse {
                origin: PathOrigin::Intervention("b".into()),
                steps_to_collapse: 1,
            })
        );
    }

    #[test]
    fn ties_keep_path_order() {
        use Phase::*;
        let paths = vec![
            path(PathOrigin::Intervention("first".into()), vec![Critical, Dead], vec![1, 2]),
            path(PathOrigin::NoAction, vec![Critical, Dead], vec![1, 2]),
        ];
        let proof = InevitabilityDetector::new().classify(&paths);
        assert_eq!(
            proof.fastest_collapse.unwrap().origin,
            PathOrigin::Intervention("first".into())
        );
    }

    #[test]
    fn monotonic_growth_without_collapse() {
        use Phase::*;
        let paths = vec![
            path(PathOrigin::Intervention("a".into()), vec![Stable, Drifting], vec![1, 1]),
            path(PathOrigin::NoAction, vec![Stable, Critical], vec![1, 4]),
        ];
        let proof = InevitabilityDetector::new().classify(&paths);
        assert_eq!(proof.proof_type, ProofType::MccsMonotonicGrowth);
        assert_eq!(proof.confidence, Some(1.0));
        assert_eq!(proof.fastest_collapse, None);
    }

    #[test]
    fn shrinking_path_breaks_inevitability() {
        use Phase::*;
        let paths = vec![
            path(PathOrigin::Intervention("a".into()), vec![Critical, Drifting], vec![4, 2]),
            path(PathOrigin::NoAction, vec![Critical, Dead], vec![4, 8]),
        ];
        let proof = InevitabilityDetector::new().classify(&paths);
        assert_eq!(proof.proof_type, ProofType::NotInevitable);
        assert_eq!(proof.confidence, None);
        assert_eq!(proof.fastest_collapse, None);
        assert_eq!(proof.collapsing_paths, 1);
    }

    #[test]
    fn simulated_critical_state_collapses_everywhere() {
        let state = StateSnapshot {
            entropy: 0.68,
            survival_ratio: 0.5,
            dead_elements: 0,
            singularities: 0,
            total_elements: 10,
        };
        let paths = CausalSimulator::default()
            .simulate(
                &state,
                &[Intervention::new("a", 0), Intervention::new("b", 0)],
            )
            .unwrap();
        let proof = InevitabilityDetector::new().classify(&paths);
        assert_eq!(proof.proof_type, ProofType::AllPathsCollapse);
        assert_eq!(proof.total_paths, 3);
        let fastest = proof.fastest_collapse.as_ref().unwrap();
        assert_eq!(fastest.steps_to_collapse, 1);
        assert_eq!(fastest.origin, PathOrigin::Intervention("a".into()));
        assert!(proof.summary().starts_with("ALL_PATHS_COLLAPSE: 3/3"));
    }

    fn any_phase() -> impl Strategy<Value = Phase> {
        prop::sample::select(vec![
            Phase::Stable,
            Phase::Drifting,
            Phase::Critical,
            Phase::Collapsing,
            Phase::Dead,
        ])
    }

    proptest! {
        #[test]
        fn classification_is_total(
            specs in prop::collection::vec(
                (prop::collection::vec(any_phase(), 1..6), prop::collection::vec(0u32..10, 1..6)),
                0..5,
            )
        ) {
            let paths: Vec<CausalPath> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (phases, sizes))| path(PathOrigin::Intervention(i.to_string()), phases, sizes))
                .collect();
            let proof = InevitabilityDetector::new().classify(&paths);
            prop_assert_eq!(proof.confidence.is_some(), proof.is_inevitable());
            prop_assert_eq!(proof.total_paths, paths.len());
            if proof.proof_type == ProofType::AllPathsCollapse {
                prop_assert!(proof.fastest_collapse.is_some());
            }
            if !proof.is_inevitable() {
                prop_assert!(proof.fastest_collapse.is_none());
            }
        }
    }
}
