//! Long-running child processes.
//!
//! # Responsibilities
//! - Spawn the API server and admin app with inherited stdio
//! - Export the run configuration into their environment
//! - Track liveness and exit status per handle
//! - Best-effort termination (hard kill, bounded reap)

pub mod child;

pub use child::{exit_code_of, ChildProcessHandle, ProcessRole, Termination};
