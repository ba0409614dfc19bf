//! ADMM solver for one cluster count, with warm-start state.
//!
//! The state is created once per solution path and threaded through every
//! solve; see [`AdmmState`].

pub mod diagnostics;
pub mod perf;
pub mod solve;
pub mod state;
pub mod termination;

pub use diagnostics::DiagnosticsConfig;
pub use perf::{PerfSection, PerfTimers};
pub use solve::admm_solve;
pub use state::AdmmState;
pub use termination::{Residuals, TerminationCriteria};
