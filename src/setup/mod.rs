//! One-shot setup pass.
//!
//! # Data Flow
//! ```text
//! schema import (only if the artifact exists)
//!     → create admin
//!     → seed sample data
//! ```
//!
//! # Design Decisions
//! - Steps run strictly in order, each exactly once
//! - A failed step is logged and recorded, never fatal
//! - Every step is bounded by `setup.step_timeout_secs`

pub mod command;
pub mod schema;

use std::fmt;

use crate::config::RunnerConfig;

pub use command::{run_command, StepContext, StepError};

/// Identifies a setup step in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    SchemaImport,
    CreateAdmin,
    SeedSample,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetupStep::SchemaImport => "schema-import",
            SetupStep::CreateAdmin => "create-admin",
            SetupStep::SeedSample => "seed-sample",
        };
        f.write_str(name)
    }
}

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: SetupStep,
    pub status: StepStatus,
}

/// Ordered record of the setup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub steps: Vec<StepOutcome>,
}

impl SetupReport {
    pub fn status_of(&self, step: SetupStep) -> Option<&StepStatus> {
        self.steps.iter().find(|o| o.step == step).map(|o| &o.status)
    }

    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|o| matches!(o.status, StepStatus::Failed(_)))
            .count()
    }

    fn record(&mut self, step: SetupStep, status: StepStatus) {
        self.steps.push(StepOutcome { step, status });
    }
}

/// Run schema import, admin creation and sample seeding in that order.
///
/// Never fails: each step's error is logged and folded into the report.
/// Dropping the returned future kills whichever step is in flight.
pub async fn run_setup(config: &RunnerConfig) -> SetupReport {
    let ctx = StepContext::from_config(config);
    let mut report = SetupReport::default();

    if !config.setup.enabled {
        tracing::info!("Setup pass disabled");
        for step in [SetupStep::SchemaImport, SetupStep::CreateAdmin, SetupStep::SeedSample] {
            report.record(step, StepStatus::Skipped("setup disabled".into()));
        }
        return report;
    }

    let schema_path = config.schema_path();
    if schema_path.is_file() {
        tracing::info!(
            path = %schema_path.display(),
            command = %schema::redacted_display(&config.database),
            "Importing DB schema"
        );
        let cmd = schema::import_command(&config.database);
        let result = run_command(&cmd, &ctx, Some(&schema_path)).await;
        report.record(
            SetupStep::SchemaImport,
            settle(SetupStep::SchemaImport, result, "ensure the schema is imported manually if needed"),
        );
    } else {
        tracing::warn!(path = %schema_path.display(), "Schema file not found, skipping import");
        report.record(
            SetupStep::SchemaImport,
            StepStatus::Skipped(format!("{} not found", schema_path.display())),
        );
    }

    tracing::info!(command = %config.setup.create_admin.display(), "Creating admin user");
    let result = run_command(&config.setup.create_admin, &ctx, None).await;
    report.record(
        SetupStep::CreateAdmin,
        settle(SetupStep::CreateAdmin, result, "the admin may already exist"),
    );

    tracing::info!(command = %config.setup.seed_sample.display(), "Seeding sample data");
    let result = run_command(&config.setup.seed_sample, &ctx, None).await;
    report.record(SetupStep::SeedSample, settle(SetupStep::SeedSample, result, "continuing"));

    tracing::info!(failures = report.failures(), "Setup pass finished");
    report
}

fn settle(step: SetupStep, result: Result<(), StepError>, hint: &str) -> StepStatus {
    match result {
        Ok(()) => StepStatus::Completed,
        Err(e) => {
            tracing::error!(step = %step, error = %e, "Setup step failed ({hint})");
            StepStatus::Failed(e.to_string())
        }
    }
}
