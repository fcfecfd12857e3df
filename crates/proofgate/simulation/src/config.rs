use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// Simulator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Steps simulated per path.
    pub depth: usize,
}

impl SimulationConfig {
    pub const DEFAULT_DEPTH: usize = 5;

    pub fn validate(&self) -> SimulationResult<()> {
        if self.depth == 0 {
            return Err(SimulationError::ZeroDepth);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            depth: Self::DEFAULT_DEPTH,
        }
    }
}
