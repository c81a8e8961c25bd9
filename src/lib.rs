//! Bootstrap runner library.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod setup;

pub use config::schema::RunnerConfig;
pub use lifecycle::{Orchestrator, RunOutcome, RunReport, Shutdown};
