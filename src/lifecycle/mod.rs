//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     CLI options → Load config → Apply overrides → Validate
//!
//! Orchestration (orchestrator.rs, state.rs):
//!     Setup pass → Spawn primary → Delay → Spawn secondary → Running
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT or secondary exit → Terminate primary → Exit with propagated code
//! ```
//!
//! # Design Decisions
//! - Ordered startup: setup steps, then primary, then secondary
//! - The startup delay is cancellable; an interrupt during it means the
//!   secondary is never spawned
//! - Child handles are owned by the orchestrator, never global

pub mod orchestrator;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use orchestrator::{Orchestrator, RunOutcome, RunReport, RunnerError};
pub use shutdown::{Shutdown, ShutdownListener};
pub use state::Phase;
