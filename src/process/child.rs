//! Supervised child process handle.

use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};

use crate::config::{CommandSpec, RunnerConfig};

/// Which of the two long-running processes a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRole {
    /// API server.
    Primary,
    /// Admin application; its exit ends the run.
    Secondary,
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessRole::Primary => f.write_str("primary"),
            ProcessRole::Secondary => f.write_str("secondary"),
        }
    }
}

/// How a termination request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process had already exited before the request.
    AlreadyExited(ExitStatus),
    /// Killed and reaped within the grace period.
    Killed(ExitStatus),
    /// The kill was sent but the process was not reaped in time.
    Unconfirmed,
    /// The kill request itself failed.
    Failed,
}

/// A spawned long-running process.
///
/// The handle owns the OS child; dropping it kills the process if it is
/// still running.
#[derive(Debug)]
pub struct ChildProcessHandle {
    role: ProcessRole,
    pid: Option<u32>,
    spawned_at: Instant,
    exit: Option<ExitStatus>,
    child: Child,
}

impl ChildProcessHandle {
    /// Spawn `spec` from the project root with inherited stdio and the
    /// configuration environment layered over the current one.
    pub fn spawn(role: ProcessRole, spec: &CommandSpec, config: &RunnerConfig) -> io::Result<Self> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(config.root())
            .envs(config.child_env())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = cmd.spawn()?;
        let pid = child.id();

        tracing::info!(role = %role, pid, command = %spec.display(), "Started process");

        Ok(Self {
            role,
            pid,
            spawned_at: Instant::now(),
            exit: None,
            child,
        })
    }

    pub fn role(&self) -> ProcessRole {
        self.role
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// When the spawn call returned.
    pub fn spawned_at(&self) -> Instant {
        self.spawned_at
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit
    }

    pub fn is_alive(&self) -> bool {
        self.exit.is_none()
    }

    /// Wait for the process to exit. Cancel safe; once the exit has been
    /// observed the stored status is returned immediately.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.exit {
            return Ok(status);
        }
        let status = self.child.wait().await?;
        self.exit = Some(status);
        Ok(status)
    }

    /// Hard-kill the process and wait up to `grace` for it to be reaped.
    ///
    /// Never fails; problems are logged and reported in the result.
    pub async fn terminate(&mut self, grace: Duration) -> Termination {
        if let Some(status) = self.exit {
            return Termination::AlreadyExited(status);
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit = Some(status);
                return Termination::AlreadyExited(status);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(role = %self.role, pid = self.pid, error = %e, "Could not poll process");
            }
        }

        tracing::info!(role = %self.role, pid = self.pid, "Terminating process");
        if let Err(e) = self.child.start_kill() {
            tracing::warn!(role = %self.role, pid = self.pid, error = %e, "Kill request failed");
            return Termination::Failed;
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                self.exit = Some(status);
                Termination::Killed(status)
            }
            Ok(Err(e)) => {
                tracing::warn!(role = %self.role, pid = self.pid, error = %e, "Could not reap process");
                Termination::Unconfirmed
            }
            Err(_) => {
                tracing::warn!(
                    role = %self.role,
                    pid = self.pid,
                    grace_ms = grace.as_millis() as u64,
                    "Process not reaped within grace period"
                );
                Termination::Unconfirmed
            }
        }
    }
}

/// Exit code the runner should report for a child's exit status.
///
/// On Unix a signal-terminated child maps to `128 + signal`, the shell
/// convention.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
