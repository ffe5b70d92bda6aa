use std::path::{Path, PathBuf};

use which::which;

use crate::config::Connection;
use crate::errors::{AppError, Result};
use crate::utils::command;

fn find_mongodump_executable() -> Result<PathBuf> {
    which("mongodump").map_err(|e| AppError::Command {
        command: "mongodump".to_string(),
        detail: format!("executable not found in PATH ({e}); install the MongoDB database tools"),
    })
}

/// Argument list for one `mongodump` invocation: host/port, auth flags when
/// credentials are set, the target database and optional collection, and the
/// fixed quiet/compressed output flags.
pub fn dump_args(
    connection: &Connection,
    database: &str,
    collection: Option<&str>,
    out_dir: &Path,
) -> Vec<String> {
    let mut args = vec![
        "--host".to_string(),
        connection.host.clone().unwrap_or_default(),
        "--port".to_string(),
        connection.port.map(|p| p.to_string()).unwrap_or_default(),
    ];

    if connection.auth() {
        args.push("-u".to_string());
        args.push(connection.username.clone().unwrap_or_default());
        args.push("-p".to_string());
        args.push(connection.password.clone().unwrap_or_default());
        if let Some(authdb) = &connection.authdb {
            args.push("--authenticationDatabase".to_string());
            args.push(authdb.clone());
        }
    }

    args.push("--db".to_string());
    args.push(database.to_string());

    if let Some(collection) = collection {
        args.push("--collection".to_string());
        args.push(collection.to_string());
    }

    args.push("--out".to_string());
    args.push(out_dir.to_string_lossy().into_owned());
    args.push("--quiet".to_string());
    args.push("--gzip".to_string());

    args
}

/// Dumps one database (or one collection of it) into the backup directory.
pub fn run_dump(
    connection: &Connection,
    database: &str,
    collection: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    let program = find_mongodump_executable()?;
    let args = dump_args(connection, database, collection, out_dir);
    command::run(&program, &args)
}
