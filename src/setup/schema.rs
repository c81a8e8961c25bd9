//! Database schema import.

use crate::config::{CommandSpec, DatabaseConfig};

/// Client invocation that applies a schema read from stdin.
///
/// `-p<password>` is attached only when a password is configured, so an
/// empty password never triggers the client's interactive prompt.
pub fn import_command(db: &DatabaseConfig) -> CommandSpec {
    let mut args = db.client_args.clone();
    args.extend(["-h".to_string(), db.host.clone(), "-u".to_string(), db.user.clone()]);
    if !db.password.is_empty() {
        args.push(format!("-p{}", db.password));
    }
    args.push(db.name.clone());

    CommandSpec {
        program: db.client.clone(),
        args,
    }
}

/// Log-safe rendering of [`import_command`]; the password is masked.
pub fn redacted_display(db: &DatabaseConfig) -> String {
    let mut cmd = import_command(db);
    let skip = db.client_args.len();
    for arg in cmd.args.iter_mut().skip(skip) {
        if arg.starts_with("-p") {
            *arg = "-p****".to_string();
        }
    }
    cmd.display()
}
