//! Shared fixtures for orchestration tests.
//!
//! Every fixture builds a throwaway project root whose setup steps and
//! servers are tiny `sh` snippets that append to `steps.log`.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use setup_runner::config::{CommandSpec, RunnerConfig};
use tempfile::TempDir;

pub const STEPS_LOG: &str = "steps.log";

pub fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", ["-c", script])
}

/// A project whose steps all succeed, with a schema file present, a
/// long-running primary and a secondary that exits with `3`.
pub fn project() -> (TempDir, RunnerConfig) {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let client_script = fake_db_client(dir.path(), 0);

    let mut config = RunnerConfig {
        root_dir: dir.path().to_path_buf(),
        ..RunnerConfig::default()
    };
    config.database.client = "sh".into();
    config.database.client_args = vec![client_script];
    config.setup.step_timeout_secs = 10;
    config.setup.create_admin = sh("echo admin >> steps.log");
    config.setup.seed_sample = sh("echo seed >> steps.log");
    config.processes.primary = sh("echo primary >> steps.log; exec sleep 30");
    config.processes.secondary = sh("echo secondary >> steps.log; exit 3");
    config.processes.startup_delay_ms = 200;
    config.processes.terminate_grace_ms = 2000;

    (dir, config)
}

pub fn write_schema(root: &Path) {
    fs::create_dir_all(root.join("db")).unwrap();
    fs::write(root.join("db").join("schema.sql"), "CREATE TABLE users (id INT);\n").unwrap();
}

/// Stand-in for the database client, run as `sh <script>`: records its
/// arguments and stdin, logs itself to `steps.log`, then exits with
/// `exit_code`. Returns the script path.
pub fn fake_db_client(root: &Path, exit_code: i32) -> String {
    let path = root.join(format!("fake-db-client-{exit_code}.sh"));
    let script = format!(
        "echo \"$@\" > import.args\ncat > imported.sql\necho import >> steps.log\nexit {exit_code}\n"
    );
    fs::write(&path, script).unwrap();
    path.to_string_lossy().into_owned()
}

pub fn steps(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join(STEPS_LOG))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
