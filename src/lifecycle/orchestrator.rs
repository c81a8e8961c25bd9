//! The bootstrap orchestrator.
//!
//! Runs the setup pass, starts the API server, waits out the startup delay,
//! starts the admin app, then waits for either the admin app to exit or an
//! interrupt. Both paths terminate the API server before returning.

use std::io;
use std::process::ExitStatus;
use std::time::Instant;

use thiserror::Error;

use crate::config::RunnerConfig;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::lifecycle::state::{Phase, PhaseTracker};
use crate::process::{exit_code_of, ChildProcessHandle, ProcessRole, Termination};
use crate::setup::{self, SetupReport};

/// Fatal orchestration errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start {role} process `{program}`: {source}")]
    Spawn {
        role: ProcessRole,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting on {role} process: {source}")]
    Wait {
        role: ProcessRole,
        #[source]
        source: io::Error,
    },
}

/// What ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The secondary process exited; its status is propagated.
    SecondaryExited(ExitStatus),
    /// An external interrupt was received.
    Interrupted,
}

impl RunOutcome {
    /// Exit code for the runner itself.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::SecondaryExited(status) => exit_code_of(*status),
            RunOutcome::Interrupted => 0,
        }
    }
}

/// Record of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `None` when an interrupt cut the setup pass short.
    pub setup: Option<SetupReport>,
    pub primary_spawned_at: Option<Instant>,
    pub secondary_spawned_at: Option<Instant>,
    /// `None` if the primary was never spawned.
    pub primary_termination: Option<Termination>,
    pub outcome: RunOutcome,
    pub phases: Vec<Phase>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

pub struct Orchestrator {
    config: RunnerConfig,
    phase: PhaseTracker,
    setup: Option<SetupReport>,
    primary_spawned_at: Option<Instant>,
    secondary_spawned_at: Option<Instant>,
}

impl Orchestrator {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            phase: PhaseTracker::new(),
            setup: None,
            primary_spawned_at: None,
            secondary_spawned_at: None,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    /// Drive the whole run to completion.
    ///
    /// Setup failures never end the run. A spawn failure of either
    /// long-running process does, after the primary (if started) has been
    /// terminated.
    pub async fn run(mut self, mut interrupt: ShutdownListener) -> Result<RunReport, RunnerError> {
        tracing::info!(
            db = %self.config.database.display_target(),
            root = %self.config.root().display(),
            "Setup runner starting"
        );

        let setup = tokio::select! {
            biased;
            () = interrupt.recv() => None,
            report = setup::run_setup(&self.config) => Some(report),
        };
        let Some(setup) = setup else {
            tracing::info!("Interrupted during setup, nothing to stop");
            return Ok(self.finish(None, RunOutcome::Interrupted));
        };
        self.setup = Some(setup);

        self.phase.advance(Phase::StartingPrimary);
        tracing::info!("Starting API server");
        let mut primary = match self.spawn(ProcessRole::Primary) {
            Ok(handle) => handle,
            Err(e) => {
                self.abort();
                return Err(e);
            }
        };
        self.primary_spawned_at = Some(primary.spawned_at());

        self.phase.advance(Phase::StartingSecondary);
        let delay = self.config.processes.startup_delay();
        let deadline = primary.spawned_at() + delay;
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before starting admin app");

        let interrupted = tokio::select! {
            biased;
            () = interrupt.recv() => true,
            () = tokio::time::sleep_until(deadline.into()) => false,
        };
        if interrupted {
            tracing::info!("Interrupted before admin app started");
            return Ok(self.shut_down(primary, RunOutcome::Interrupted).await);
        }

        tracing::info!("Starting admin app");
        let mut secondary = match self.spawn(ProcessRole::Secondary) {
            Ok(handle) => handle,
            Err(e) => {
                self.stop_primary(&mut primary).await;
                return Err(e);
            }
        };
        self.secondary_spawned_at = Some(secondary.spawned_at());

        self.phase.advance(Phase::Running);
        let outcome = loop {
            tokio::select! {
                status = secondary.wait() => break status.map(RunOutcome::SecondaryExited),
                status = primary.wait(), if primary.is_alive() => {
                    match status {
                        Ok(status) => tracing::warn!(
                            code = exit_code_of(status),
                            "API server exited on its own; still waiting for admin app"
                        ),
                        Err(e) => tracing::warn!(error = %e, "Lost track of API server"),
                    }
                }
                () = interrupt.recv() => break Ok(RunOutcome::Interrupted),
            }
        };

        match outcome {
            Ok(outcome) => {
                if let RunOutcome::SecondaryExited(status) = outcome {
                    tracing::info!(code = exit_code_of(status), "Admin app exited");
                }
                Ok(self.shut_down(primary, outcome).await)
            }
            Err(source) => {
                self.stop_primary(&mut primary).await;
                Err(RunnerError::Wait {
                    role: ProcessRole::Secondary,
                    source,
                })
            }
        }
    }

    fn spawn(&self, role: ProcessRole) -> Result<ChildProcessHandle, RunnerError> {
        let spec = match role {
            ProcessRole::Primary => &self.config.processes.primary,
            ProcessRole::Secondary => &self.config.processes.secondary,
        };
        ChildProcessHandle::spawn(role, spec, &self.config).map_err(|source| {
            tracing::error!(role = %role, program = %spec.program, error = %source, "Spawn failed");
            RunnerError::Spawn {
                role,
                program: spec.program.clone(),
                source,
            }
        })
    }

    fn abort(&mut self) {
        self.phase.advance(Phase::ShuttingDown);
        self.phase.advance(Phase::Terminated);
    }

    /// Best-effort stop of the primary on an error path.
    async fn stop_primary(&mut self, primary: &mut ChildProcessHandle) {
        self.phase.advance(Phase::ShuttingDown);
        primary.terminate(self.config.processes.terminate_grace()).await;
        self.phase.advance(Phase::Terminated);
    }

    async fn shut_down(mut self, mut primary: ChildProcessHandle, outcome: RunOutcome) -> RunReport {
        self.phase.advance(Phase::ShuttingDown);
        let termination = primary.terminate(self.config.processes.terminate_grace()).await;
        tracing::debug!(?termination, "API server stopped");
        self.finish(Some(termination), outcome)
    }

    fn finish(mut self, primary_termination: Option<Termination>, outcome: RunOutcome) -> RunReport {
        if self.phase.current() != Phase::ShuttingDown {
            self.phase.advance(Phase::ShuttingDown);
        }
        self.phase.advance(Phase::Terminated);
        tracing::info!(exit_code = outcome.exit_code(), "Setup runner finished");

        RunReport {
            setup: self.setup,
            primary_spawned_at: self.primary_spawned_at,
            secondary_spawned_at: self.secondary_spawned_at,
            primary_termination,
            outcome,
            phases: self.phase.history().to_vec(),
        }
    }
}
