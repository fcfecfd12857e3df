//! Forward causal simulator.
//!
//! Each step applies a closed-form update to the state:
//!
//! | Path         | Δ survival     | dead | singularities | repair            |
//! |--------------|----------------|------|---------------|-------------------|
//! | intervention | +0.03 − 0.02   | +1   | +0            | up to capacity    |
//! | no action    | −0.05          | +2   | +1            | none              |
//!
//! ```text
//! entropy' = clamp(entropy − 0.5·Δsurvival + 0.3·Δdead/total + 0.2·Δsingularities/total)
//! ```

use std::collections::HashSet;

use proofgate_types::Phase;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::{SimulationError, SimulationResult};
use crate::path::{CausalPath, PathOrigin};
use crate::state::{Intervention, StateSnapshot};

pub const INTERVENTION_BENEFIT: f64 = 0.03;
pub const NATURAL_DECAY: f64 = 0.02;
pub const NO_ACTION_DECAY: f64 = 0.05;

const SURVIVAL_WEIGHT: f64 = 0.5;
const DEAD_WEIGHT: f64 = 0.3;
const SINGULARITY_WEIGHT: f64 = 0.2;

/// Deterministic multi-path simulator.
#[derive(Clone, Debug, Default)]
pub struct CausalSimulator {
    config: SimulationConfig,
}

impl CausalSimulator {
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn depth(&self) -> usize {
        self.config.depth
    }

    /// Simulate one path per intervention (input order), then the
    /// no-action baseline. Always returns at least the baseline.
    pub fn simulate(
        &self,
        state: &StateSnapshot,
        interventions: &[Intervention],
    ) -> SimulationResult<Vec<CausalPath>> {
        state.validate()?;

        let mut seen = HashSet::new();
        for intervention in interventions {
            if intervention.id.is_empty() {
                return Err(SimulationError::EmptyInterventionId);
            }
            if !seen.insert(intervention.id.as_str()) {
                return Err(SimulationError::DuplicateIntervention(
                    intervention.id.clone(),
                ));
            }
        }

        let mut paths = Vec::with_capacity(interventions.len() + 1);
        for intervention in interventions {
            paths.push(self.simulate_path(state, Some(intervention)));
        }
        paths.push(self.simulate_path(state, None));
        Ok(paths)
    }

    /// Simulate a single path. `state` is assumed valid.
    pub fn simulate_path(
        &self,
        state: &StateSnapshot,
        intervention: Option<&Intervention>,
    ) -> CausalPath {
        let depth = self.config.depth;
        let mut current = state.clone();
        let mut phase = state.phase();

        let mut entropy_trajectory = Vec::with_capacity(depth + 1);
        let mut phase_trajectory = Vec::with_capacity(depth + 1);
        let mut size_trajectory = Vec::with_capacity(depth + 1);
        entropy_trajectory.push(current.entropy);
        phase_trajectory.push(phase);
        size_trajectory.push(current.mccs_size());

        for _ in 0..depth {
            let next = step(&current, intervention);
            phase = next_phase(phase, current.entropy, next.entropy, intervention.is_some());
            entropy_trajectory.push(next.entropy);
            phase_trajectory.push(phase);
            size_trajectory.push(next.mccs_size());
            current = next;
        }

        let origin = match intervention {
            Some(i) => PathOrigin::Intervention(i.id.clone()),
            None => PathOrigin::NoAction,
        };
        let leads_to_collapse = phase.is_collapsed();
        let monotonic_growth = CausalPath::sizes_non_decreasing(&size_trajectory);

        debug!(
            origin = %origin,
            terminal_phase = %phase,
            terminal_entropy = current.entropy,
            leads_to_collapse,
            monotonic_growth,
            "causal path simulated"
        );

        CausalPath {
            origin,
            entropy_trajectory,
            phase_trajectory,
            size_trajectory,
            terminal: current,
            terminal_phase: phase,
            leads_to_collapse,
            monotonic_growth,
        }
    }
}

fn step(prev: &StateSnapshot, intervention: Option<&Intervention>) -> StateSnapshot {
    let (survival_delta, dead_growth, singularity_growth) = match intervention {
        Some(_) => (INTERVENTION_BENEFIT - NATURAL_DECAY, 1, 0),
        None => (-NO_ACTION_DECAY, 2, 1),
    };

    let total = prev.total_elements;
    let survival_ratio = (prev.survival_ratio + survival_delta).clamp(0.0, 1.0);
    let mut singularities = prev.singularities.saturating_add(singularity_growth).min(total);
    let mut dead_elements = prev
        .dead_elements
        .saturating_add(dead_growth)
        .min(total - singularities);

    if let Some(intervention) = intervention {
        let mut capacity = intervention.repair_capacity;
        let repaired = capacity.min(singularities);
        singularities -= repaired;
        capacity -= repaired;
        dead_elements -= capacity.min(dead_elements);
    }

    let entropy = next_entropy(prev, survival_ratio, dead_elements, singularities);
    StateSnapshot {
        entropy,
        survival_ratio,
        dead_elements,
        singularities,
        total_elements: total,
    }
}

fn next_entropy(prev: &StateSnapshot, survival: f64, dead: u32, singularities: u32) -> f64 {
    let delta_survival = survival - prev.survival_ratio;
    let (dead_fraction, singularity_fraction) = if prev.total_elements == 0 {
        (0.0, 0.0)
    } else {
        let total = f64::from(prev.total_elements);
        (
            (f64::from(dead) - f64::from(prev.dead_elements)) / total,
            (f64::from(singularities) - f64::from(prev.singularities)) / total,
        )
    };

    (prev.entropy - SURVIVAL_WEIGHT * delta_survival
        + DEAD_WEIGHT * dead_fraction
        + SINGULARITY_WEIGHT * singularity_fraction)
        .clamp(0.0, 1.0)
}

/// Intervention paths adopt the classified phase only while entropy is
/// strictly falling; every other step may only keep or worsen the phase.
fn next_phase(previous: Phase, prev_entropy: f64, entropy: f64, intervening: bool) -> Phase {
    let classified = Phase::classify(entropy);
    if intervening && entropy < prev_entropy {
        classified
    } else {
        previous.max(classified)
    }
}
