//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / setup / process / lifecycle
//!     → tracing events with structured fields (role, pid, step, exit code)
//!     → logging.rs (fmt layer on stderr, filtered by RUST_LOG)
//! ```
//!
//! # Design Decisions
//! - One subscriber, installed once by the binary before config is loaded
//! - Child processes keep their own stdout/stderr; the runner never wraps them

pub mod logging;
