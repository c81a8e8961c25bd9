//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! compiled-in defaults
//!     → optional TOML file (loader.rs)
//!     → DB_* / ENCRYPTION_KEY environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → RunnerConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so the runner works with no file at all
//! - Empty environment values are treated as unset

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CommandSpec, DatabaseConfig, ProcessesConfig, RunnerConfig, SetupConfig};
