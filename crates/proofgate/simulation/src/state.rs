use proofgate_types::Phase;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// Snapshot of the simulated system at one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Entropy score in `[0, 1]`.
    pub entropy: f64,
    /// Fraction of requirements still satisfied, in `[0, 1]`.
    pub survival_ratio: f64,
    pub dead_elements: u32,
    pub singularities: u32,
    pub total_elements: u32,
}

impl StateSnapshot {
    /// Reject snapshots the simulator cannot start from.
    pub fn validate(&self) -> SimulationResult<()> {
        if !(0.0..=1.0).contains(&self.entropy) {
            return Err(SimulationError::InvalidState {
                field: "entropy",
                value: self.entropy.to_string(),
                reason: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.survival_ratio) {
            return Err(SimulationError::InvalidState {
                field: "survival_ratio",
                value: self.survival_ratio.to_string(),
                reason: "must be within [0, 1]",
            });
        }
        let affected = u64::from(self.dead_elements) + u64::from(self.singularities);
        if affected > u64::from(self.total_elements) {
            return Err(SimulationError::InvalidState {
                field: "dead_elements + singularities",
                value: affected.to_string(),
                reason: "exceeds total_elements",
            });
        }
        Ok(())
    }

    /// Size of the minimal critical cut set: every element needing repair.
    pub fn mccs_size(&self) -> u32 {
        self.dead_elements + self.singularities
    }

    pub fn phase(&self) -> Phase {
        Phase::classify(self.entropy)
    }
}

/// A named candidate intervention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: String,
    /// Elements repaired per step, singularities first.
    pub repair_capacity: u32,
}

impl Intervention {
    pub fn new(id: impl Into<String>, repair_capacity: u32) -> Self {
        Self {
            id: id.into(),
            repair_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> StateSnapshot {
        StateSnapshot {
            entropy: 0.4,
            survival_ratio: 0.8,
            dead_elements: 2,
            singularities: 1,
            total_elements: 10,
        }
    }

    #[test]
    fn valid_state_passes() {
        assert!(state().validate().is_ok());
        assert_eq!(state().mccs_size(), 3);
        assert_eq!(state().phase(), Phase::Drifting);
    }

    #[test]
    fn entropy_out_of_range_rejected() {
        let mut s = state();
        s.entropy = 1.2;
        assert!(matches!(
            s.validate(),
            Err(SimulationError::InvalidState { field: "entropy", .. })
        ));
        s.entropy = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn affected_elements_cannot_exceed_total() {
        let mut s = state();
        s.dead_elements = 9;
        s.singularities = 2;
        assert!(s.validate().is_err());
    }
}
