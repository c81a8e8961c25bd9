//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the runner.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a bootstrap run.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Project root. Relative paths and child working directories resolve here.
    pub root_dir: PathBuf,

    /// Database connection settings, shared with every child process.
    pub database: DatabaseConfig,

    /// Key handed to the application servers as `ENCRYPTION_KEY`.
    pub encryption_key: String,

    /// One-shot setup steps.
    pub setup: SetupConfig,

    /// Long-running supervised processes.
    pub processes: ProcessesConfig,
}

/// Database settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Client binary used for the schema import.
    pub client: String,

    /// Arguments placed before the connection flags, e.g. a wrapper such
    /// as `docker exec -i db mysql` split into program and args.
    pub client_args: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            name: "urs_biometric".to_string(),
            user: "root".to_string(),
            password: String::new(),
            client: "mysql".to_string(),
            client_args: Vec::new(),
        }
    }
}

impl DatabaseConfig {
    /// `user@host/name`, never including the password.
    pub fn display_target(&self) -> String {
        format!("{}@{}/{}", self.user, self.host, self.name)
    }
}

/// An external program invocation. Arguments are passed verbatim, never
/// through a shell.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Shell-like rendering for log lines.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                out.push('"');
                out.push_str(arg);
                out.push('"');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

/// Setup pass configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SetupConfig {
    /// Run the setup pass at all.
    pub enabled: bool,

    /// Schema artifact, relative to `root_dir` unless absolute.
    pub schema_path: PathBuf,

    /// Upper bound for a single setup step.
    pub step_timeout_secs: u64,

    /// Non-interactive admin account creation.
    pub create_admin: CommandSpec,

    /// Sample data seeding.
    pub seed_sample: CommandSpec,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schema_path: PathBuf::from("db").join("schema.sql"),
            step_timeout_secs: 300,
            create_admin: CommandSpec::new(
                "php",
                [
                    "api/scripts/create_admin_cli.php",
                    "--username=admin",
                    "--password=admin123",
                    "--name=Administrator",
                ],
            ),
            seed_sample: CommandSpec::new("php", ["api/scripts/seed_sample_cli.php"]),
        }
    }
}

impl SetupConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

/// Supervised process configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProcessesConfig {
    /// API server, started first.
    pub primary: CommandSpec,

    /// Admin application, started after `startup_delay_ms`. Its exit ends the run.
    pub secondary: CommandSpec,

    /// Gap between the primary spawn returning and the secondary spawn.
    pub startup_delay_ms: u64,

    /// How long to wait for a killed process to be reaped.
    pub terminate_grace_ms: u64,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        Self {
            primary: CommandSpec::new("php", ["-S", "localhost:8000", "-t", "api"]),
            secondary: CommandSpec::new("dotnet", ["run", "--project", "admin/URS.Admin.csproj"]),
            startup_delay_ms: 1500,
            terminate_grace_ms: 5000,
        }
    }
}

impl ProcessesConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }
}

impl RunnerConfig {
    /// Project root; an unset root means the current directory.
    pub fn root(&self) -> &Path {
        if self.root_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root_dir
        }
    }

    /// Absolute or root-relative location of the schema artifact.
    pub fn schema_path(&self) -> PathBuf {
        self.root().join(&self.setup.schema_path)
    }

    /// Variables exported to every spawned program, on top of the inherited
    /// environment.
    pub fn child_env(&self) -> Vec<(&'static str, String)> {
        vec![
            ("DB_HOST", self.database.host.clone()),
            ("DB_NAME", self.database.name.clone()),
            ("DB_USER", self.database.user.clone()),
            ("DB_PASS", self.database.password.clone()),
            ("ENCRYPTION_KEY", self.encryption_key.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RunnerConfig::default();
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.database.name, "urs_biometric");
        assert_eq!(config.database.user, "root");
        assert!(config.database.password.is_empty());
        assert!(config.encryption_key.is_empty());
        assert_eq!(config.processes.startup_delay(), Duration::from_millis(1500));
        assert!(config.processes.primary.args.iter().any(|a| a == "localhost:8000"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RunnerConfig = toml::from_str(
            r#"
            [database]
            name = "other_db"

            [processes]
            startup_delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.database.name, "other_db");
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.processes.startup_delay_ms, 10);
        assert_eq!(config.processes.secondary.program, "dotnet");
        assert!(config.setup.enabled);
    }

    #[test]
    fn command_display_quotes_whitespace() {
        let cmd = CommandSpec::new("php", ["create.php", "--name=Site Admin"]);
        assert_eq!(cmd.display(), "php create.php \"--name=Site Admin\"");
    }

    #[test]
    fn child_env_carries_database_settings() {
        let mut config = RunnerConfig::default();
        config.database.password = "pw".into();
        config.encryption_key = "k".into();

        let env = config.child_env();
        assert!(env.contains(&("DB_PASS", "pw".to_string())));
        assert!(env.contains(&("ENCRYPTION_KEY", "k".to_string())));
        assert!(env.contains(&("DB_NAME", "urs_biometric".to_string())));
    }
}
