use std::path::{Path, PathBuf};

use which::which;

use crate::config::Connection;
use crate::errors::{AppError, Result};
use crate::utils::command;

fn find_mongorestore_executable() -> Result<PathBuf> {
    which("mongorestore").map_err(|e| AppError::Command {
        command: "mongorestore".to_string(),
        detail: format!("executable not found in PATH ({e}); install the MongoDB database tools"),
    })
}

/// Argument list for one `mongorestore` invocation against the destination
/// connection. `--db` is passed only when remapping to a destination
/// database; existing data is always dropped first and input is compressed.
pub fn restore_args(
    connection: &Connection,
    destination_database: Option<&str>,
    ns_include: &str,
    dir: &Path,
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

    if let Some(destination_database) = destination_database {
        args.push("--db".to_string());
        args.push(destination_database.to_string());
    }

    args.push("--nsInclude".to_string());
    args.push(ns_include.to_string());
    args.push("--drop".to_string());
    args.push("--dir".to_string());
    args.push(dir.to_string_lossy().into_owned());
    args.push("--gzip".to_string());

    args
}

/// Restores one namespace from a backup directory.
pub fn run_restore(
    connection: &Connection,
    destination_database: Option<&str>,
    ns_include: &str,
    dir: &Path,
) -> Result<()> {
    let program = find_mongorestore_executable()?;
    let args = restore_args(connection, destination_database, ns_include, dir);
    command::run(&program, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionLayer;

    fn connection(auth: bool) -> Connection {
        Connection::from_layer(
            "default",
            &ConnectionLayer {
                host: Some("localhost".into()),
                port: Some(27017),
                username: auth.then(|| "u".to_string()),
                password: auth.then(|| "p".to_string()),
                authdb: auth.then(|| "admin".to_string()),
            },
        )
    }

    #[test]
    fn test_restore_args_whole_database() {
        let args = restore_args(&connection(false), None, "d1.*", Path::new("/backups/x"));
        assert_eq!(
            args,
            vec![
                "--host",
                "localhost",
                "--port",
                "27017",
                "--nsInclude",
                "d1.*",
                "--drop",
                "--dir",
                "/backups/x",
                "--gzip",
            ]
        );
    }

    #[test]
    fn test_restore_args_with_auth_and_destination() {
        let args = restore_args(
            &connection(true),
            Some("d1_copy"),
            "d1.c1",
            Path::new("/backups/x/d1"),
        );
        assert_eq!(
            args,
            vec![
                "--host",
                "localhost",
                "--port",
                "27017",
                "-u",
                "u",
                "-p",
                "p",
                "--authenticationDatabase",
                "admin",
                "--db",
                "d1_copy",
                "--nsInclude",
                "d1.c1",
                "--drop",
                "--dir",
                "/backups/x/d1",
                "--gzip",
            ]
        );
    }
}
