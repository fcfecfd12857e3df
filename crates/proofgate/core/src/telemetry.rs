//! Tracing subscriber setup for hosts embedding ProofGate.
//!
//! Library crates only emit events; installing a subscriber is the host's
//! call, made once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TracingConfig;
use crate::error::{ProofGateError, ProofGateResult};

/// Install a global fmt subscriber. `RUST_LOG` overrides `config.filter`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> ProofGateResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| ProofGateError::Config(format!("invalid tracing filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| ProofGateError::Telemetry(e.to_string()))
}
