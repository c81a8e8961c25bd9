//! Startup configuration resolution.
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - Command-line options beat the file and the environment

use std::path::PathBuf;

use crate::config::{load_config, ConfigError, RunnerConfig};

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub config_path: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub skip_setup: bool,
    pub startup_delay_ms: Option<u64>,
}

/// Produce the final, validated configuration for a run.
pub fn resolve_config<F>(options: &StartupOptions, lookup: F) -> Result<RunnerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_config(options.config_path.as_deref(), lookup)?;

    if let Some(root) = &options.root_dir {
        config.root_dir = root.clone();
    }
    if options.skip_setup {
        config.setup.enabled = false;
    }
    if let Some(delay) = options.startup_delay_ms {
        config.processes.startup_delay_ms = delay;
    }

    tracing::info!(
        db = %config.database.display_target(),
        setup_enabled = config.setup.enabled,
        startup_delay_ms = config.processes.startup_delay_ms,
        "Configuration loaded"
    );

    Ok(config)
}
