//! # proofgate-simulation
//!
//! Deterministic forward simulation of a system's degradation and the
//! classifier that decides whether collapse is inevitable.
//!
//! ```text
//!  StateSnapshot ──┬── Intervention "a" ──► CausalPath (a)
//!                  ├── Intervention "b" ──► CausalPath (b)
//!                  └── (none) ────────────► CausalPath (NoAction)
//!                                                │
//!                              InevitabilityDetector::classify
//!                                                ▼
//!                                      InevitabilityProof
//! ```
//!
//! Everything here is a pure function of its inputs: closed-form
//! arithmetic, fixed depth, no randomness, no I/O.
//!
//! ## Proof types
//!
//! | Type                  | Condition                                   |
//! |-----------------------|---------------------------------------------|
//! | `AllPathsCollapse`    | every path ends COLLAPSING or DEAD          |
//! | `MccsMonotonicGrowth` | every path's intervention size never shrinks |
//! | `NotInevitable`       | otherwise, including an empty path set      |

#![deny(unsafe_code)]

pub mod config;
pub mod detector;
pub mod error;
pub mod path;
pub mod simulator;
pub mod state;

pub use config::SimulationConfig;
pub use detector::{FastestCollapse, InevitabilityDetector, InevitabilityProof, ProofType};
pub use error::{SimulationError, SimulationResult};
pub use path::{CausalPath, PathOrigin};
pub use simulator::CausalSimulator;
pub use state::{Intervention, StateSnapshot};
