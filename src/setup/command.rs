//! Execution of one-shot setup commands.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;

use crate::config::{CommandSpec, RunnerConfig};

/// Why a setup step did not complete.
#[derive(Debug, Error)]
pub enum StepError {
    /// The program could not be started (missing binary, bad cwd, ...).
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The stdin artifact could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },

    /// The program outlived the step timeout and was killed.
    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}

/// Everything a setup command inherits from the run.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub root: PathBuf,
    pub env: Vec<(&'static str, String)>,
    pub timeout: Duration,
}

impl StepContext {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            root: config.root().to_path_buf(),
            env: config.child_env(),
            timeout: config.setup.step_timeout(),
        }
    }
}

/// Run `spec` to completion with inherited stdout/stderr.
///
/// Logging the command line is left to the caller, which knows whether it
/// carries secrets.
///
/// When `stdin_from` is given, that file is connected to the program's
/// standard input. The child is killed if the step times out or the
/// returned future is dropped.
pub async fn run_command(
    spec: &CommandSpec,
    ctx: &StepContext,
    stdin_from: Option<&Path>,
) -> Result<(), StepError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&ctx.root)
        .envs(ctx.env.iter().map(|(k, v)| (*k, v.as_str())))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    match stdin_from {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|source| StepError::Input {
                path: path.to_path_buf(),
                source,
            })?;
            cmd.stdin(Stdio::from(file));
        }
        None => {
            cmd.stdin(Stdio::null());
        }
    }

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|source| StepError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    let status = match tokio::time::timeout(ctx.timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(source)) => {
            return Err(StepError::Spawn {
                program: spec.program.clone(),
                source,
            })
        }
        Err(_) => {
            // Dropping `child` kills it.
            return Err(StepError::Timeout {
                program: spec.program.clone(),
                timeout: ctx.timeout,
            });
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status.success() {
        tracing::debug!(program = %spec.program, elapsed_ms, "Command finished");
        Ok(())
    } else {
        Err(StepError::Failed {
            program: spec.program.clone(),
            status,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn ctx(root: &Path) -> StepContext {
        StepContext {
            root: root.to_path_buf(),
            env: vec![("DB_NAME", "test_db".to_string())],
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn successful_command() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("true", Vec::<String>::new());
        assert!(run_command(&spec, &ctx(dir.path()), None).await.is_ok());
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", ["-c", "exit 7"]);
        let err = run_command(&spec, &ctx(dir.path()), None).await.unwrap_err();
        match err {
            StepError::Failed { status, .. } => assert_eq!(status.code(), Some(7)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("definitely-not-a-real-binary-xyz", Vec::<String>::new());
        let err = run_command(&spec, &ctx(dir.path()), None).await.unwrap_err();
        assert!(matches!(err, StepError::Spawn { .. }));
    }

    #[tokio::test]
    async fn environment_and_cwd_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", ["-c", "test \"$DB_NAME\" = test_db && echo ok > marker"]);
        run_command(&spec, &ctx(dir.path()), None).await.unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn stdin_is_fed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.sql");
        std::fs::write(&input, "CREATE TABLE t;\n").unwrap();

        let spec = CommandSpec::new("sh", ["-c", "cat > copied.sql"]);
        run_command(&spec, &ctx(dir.path()), Some(&input)).await.unwrap();

        let copied = std::fs::read_to_string(dir.path().join("copied.sql")).unwrap();
        assert_eq!(copied, "CREATE TABLE t;\n");
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ctx(dir.path());
        ctx.timeout = Duration::from_millis(100);

        let spec = CommandSpec::new("sleep", ["10"]);
        let err = run_command(&spec, &ctx, None).await.unwrap_err();
        assert!(matches!(err, StepError::Timeout { .. }));
    }
}
