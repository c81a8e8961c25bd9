//! Configuration validation.
//!
//! Only the runner's own settings are checked. Database values are handed
//! to external tools as-is; those tools reject bad values themselves.

use thiserror::Error;

use crate::config::schema::{CommandSpec, RunnerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: program must not be empty")]
    EmptyProgram { field: &'static str },

    #[error("database.client must not be empty")]
    EmptyDatabaseClient,

    #[error("setup.step_timeout_secs must be greater than zero")]
    ZeroStepTimeout,
}

/// Check `config`, returning every problem found rather than only the first.
pub fn validate_config(config: &RunnerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let commands: [(&'static str, &CommandSpec); 4] = [
        ("setup.create_admin", &config.setup.create_admin),
        ("setup.seed_sample", &config.setup.seed_sample),
        ("processes.primary", &config.processes.primary),
        ("processes.secondary", &config.processes.secondary),
    ];
    for (field, command) in commands {
        if command.program.trim().is_empty() {
            errors.push(ValidationError::EmptyProgram { field });
        }
    }

    if config.database.client.trim().is_empty() {
        errors.push(ValidationError::EmptyDatabaseClient);
    }

    if config.setup.step_timeout_secs == 0 {
        errors.push(ValidationError::ZeroStepTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RunnerConfig::default()).is_ok());
    }

    #[test]
    fn reports_all_errors() {
        let mut config = RunnerConfig::default();
        config.processes.primary.program = String::new();
        config.processes.secondary.program = "  ".into();
        config.setup.step_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyProgram { field: "processes.primary" },
                ValidationError::EmptyProgram { field: "processes.secondary" },
                ValidationError::ZeroStepTimeout,
            ]
        );
    }

    #[test]
    fn empty_password_is_accepted() {
        let mut config = RunnerConfig::default();
        config.database.password.clear();
        config.database.host.clear();
        assert!(validate_config(&config).is_ok());
    }
}
