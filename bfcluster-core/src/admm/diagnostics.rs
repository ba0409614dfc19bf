//! Env-gated per-iteration trace of the ADMM loop on stderr.
//!
//! Written with `eprintln!`, bypassing the `log` facade.

use std::env;

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => v != "0" && !v.eq_ignore_ascii_case("false"),
        Err(_) => default,
    }
}

/// Trace switches read from the environment.
///
/// - `BFCLUSTER_DIAGNOSTICS=1` enables the trace
/// - `BFCLUSTER_DIAGNOSTICS_EVERY=n` prints every n-th iteration (default 1)
/// - `BFCLUSTER_DIAGNOSTICS_BIRKHOFF=0` drops the inner Dykstra sub-iteration
///   count and marginal violation from each line
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    pub every: usize,
    pub birkhoff_detail: bool,
}

impl DiagnosticsConfig {
    pub fn from_env() -> Self {
        let every = env::var("BFCLUSTER_DIAGNOSTICS_EVERY")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(1);

        Self {
            enabled: env_flag("BFCLUSTER_DIAGNOSTICS", false),
            every,
            birkhoff_detail: env_flag("BFCLUSTER_DIAGNOSTICS_BIRKHOFF", true),
        }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, every: 1, birkhoff_detail: false }
    }

    #[inline]
    pub fn should_log(&self, iter: usize) -> bool {
        self.enabled && (iter % self.every == 0)
    }
}
