//! setup-runner
//!
//! Prepares a local checkout and runs it: imports the database schema,
//! seeds an admin user and sample data, then starts the API server and the
//! admin app as supervised children.
//!
//! # Lifecycle
//!
//! ```text
//!   schema import ─▶ create admin ─▶ seed sample        (failures logged, never fatal)
//!                                        │
//!                                        ▼
//!                             spawn API server (primary)
//!                                        │  startup delay
//!                                        ▼
//!                             spawn admin app (secondary)
//!                                        │
//!              ┌─────────────────────────┴─────────────────────────┐
//!              ▼                                                   ▼
//!      admin app exits with N                              SIGINT received
//!      kill API server, exit N                         kill API server, exit 0
//! ```
//!
//! # Environment variables
//!
//! | Variable         | Default         |
//! |------------------|-----------------|
//! | `DB_HOST`        | `127.0.0.1`     |
//! | `DB_NAME`        | `urs_biometric` |
//! | `DB_USER`        | `root`          |
//! | `DB_PASS`        | (empty)         |
//! | `ENCRYPTION_KEY` | (empty)         |

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use setup_runner::config::loader::process_env;
use setup_runner::lifecycle::signals::forward_interrupt;
use setup_runner::lifecycle::startup::{resolve_config, StartupOptions};
use setup_runner::lifecycle::{Orchestrator, Shutdown};
use setup_runner::observability::logging::{init_logging, DEFAULT_FILTER};

#[derive(Parser)]
#[command(name = "setup-runner")]
#[command(about = "Import schema, seed data, then run the API server and admin app", long_about = None)]
struct Cli {
    /// TOML configuration file. Every setting has a default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root; children run here and `db/schema.sql` is resolved against it.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Skip schema import and seeding.
    #[arg(long)]
    skip_setup: bool,

    /// Delay between starting the API server and the admin app.
    #[arg(long)]
    startup_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(DEFAULT_FILTER);

    let options = StartupOptions {
        config_path: cli.config,
        root_dir: cli.root,
        skip_setup: cli.skip_setup,
        startup_delay_ms: cli.startup_delay_ms,
    };

    let config = match resolve_config(&options, process_env) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let interrupt = shutdown.listener();
    let _signals = forward_interrupt(Arc::clone(&shutdown));

    match Orchestrator::new(config).run(interrupt).await {
        Ok(report) => ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)),
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
