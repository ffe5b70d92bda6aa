//! MongoDB Backup and Restore Manager
//!
//! Orchestrates mongodump/mongorestore against named connections and tracks
//! per-backup metadata under the configured storage root.

mod backup;
mod config;
mod errors;
mod logging;
mod metadata;
mod names;
mod restore;
mod server;
mod storage;
mod utils;

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;

use backup::BackupOptions;
use config::ConfigStore;
use restore::RestoreOptions;

const DEFAULT_CONFIG_FILE: &str = "~/.mongotool.json";

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run_app(&args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run_app(args: &[String]) -> Result<()> {
    let cli = parse_args(args)?;

    let mut config = ConfigStore::new();
    match &cli.config_file {
        Some(path) => config.add_file(path),
        None => config.add_file(DEFAULT_CONFIG_FILE),
    }
    if let Some(name) = &cli.connection {
        config.set_connection(name.clone());
    }

    logging::init(&config).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Command::Backup(options) => {
            println!("🚀 Starting backup...");
            let name = backup::perform_backup(&config, &options)
                .await
                .context("Backup failed")?;
            println!("✅ Backup '{name}' created.");
        }
        Command::Restore(options) => {
            println!("🔄 Restoring backup '{}'...", options.name);
            restore::perform_restore(&config, &options).context("Restore failed")?;
            println!("✅ Backup '{}' restored.", options.name);
        }
        Command::Backups => {
            for name in storage::backups(&config)? {
                println!("{name}");
            }
        }
        Command::Connections => {
            let counts = storage::connection_directories_with_counts(&config)?;
            for connection in config.registry().connections() {
                let socket = connection.socket();
                let backups = counts
                    .iter()
                    .find(|(dir, _)| *dir == socket)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                let marker = if connection.name == config.connection_name() {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}\t{socket}\t{backups} backup(s)", connection.name);
            }
            // socket directories left behind by connections no longer configured
            for (dir, count) in &counts {
                if matches!(config.registry().get_by_socket(dir), Ok(None)) {
                    println!("  {dir}\t(not configured)\t{count} backup(s)");
                }
            }
        }
        Command::Meta { name } => {
            let backup_dir = storage::backup_dir(&config, &name)?;
            if !backup_dir.exists() {
                return Err(errors::AppError::BackupNotFound(name).into());
            }
            let recorded = metadata::read(&backup_dir, config.connection()?)?;
            println!("{}", serde_json::to_string_pretty(&recorded)?);
        }
        Command::Remove { name } => {
            storage::remove_backup(&config, &name)?;
            println!("✅ Backup '{name}' removed.");
        }
    }

    Ok(())
}

#[derive(Debug)]
struct Cli {
    config_file: Option<String>,
    connection: Option<String>,
    command: Command,
}

#[derive(Debug)]
enum Command {
    Backup(BackupOptions),
    Restore(RestoreOptions),
    Backups,
    Connections,
    Meta { name: String },
    Remove { name: String },
}

fn usage() -> &'static str {
    concat!(
        "Usage: mongotool [--config PATH] [--connection NAME] <command>\n",
        "\n",
        "Commands:\n",
        "  backup  [-m MSG] [-d db1,db2] [-c coll1,coll2]\n",
        "  restore <name> [-d db1,db2] [-c coll1,coll2]\n",
        "          [--destination-databases db1,db2] [--destination-connection NAME]\n",
        "  backups             list backups for the active connection\n",
        "  connections         list configured connections\n",
        "  meta    <name>      print a backup's metadata\n",
        "  remove  <name>      delete a backup",
    )
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config_file = None;
    let mut connection = None;
    let mut command = None;
    let mut positionals: Vec<String> = Vec::new();
    let mut message = None;
    let mut databases = None;
    let mut collections = None;
    let mut destination_databases = None;
    let mut destination_connection = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("Option '{flag}' requires a value"))
        };
        match arg.as_str() {
            "--config" => config_file = Some(value("--config")?),
            "--connection" => connection = Some(value("--connection")?),
            "-m" | "--message" => message = Some(value("--message")?),
            "-d" | "--databases" => databases = Some(split_list(&value("--databases")?)),
            "-c" | "--collections" => collections = Some(split_list(&value("--collections")?)),
            "--destination-databases" => {
                destination_databases = Some(split_list(&value("--destination-databases")?));
            }
            "--destination-connection" => {
                destination_connection = Some(value("--destination-connection")?);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                anyhow::bail!("Unknown option '{other}'\n{}", usage());
            }
            other => {
                if command.is_none() {
                    command = Some(other.to_string());
                } else {
                    positionals.push(other.to_string());
                }
            }
        }
    }

    let command = command.with_context(|| format!("No command given\n{}", usage()))?;
    let mut name = positionals.into_iter();

    let command = match command.as_str() {
        "backup" => Command::Backup(BackupOptions {
            message,
            databases,
            collections,
        }),
        "restore" => Command::Restore(RestoreOptions {
            name: name.next().context("'restore' requires a backup name")?,
            databases,
            collections,
            destination_databases,
            destination_connection,
        }),
        "backups" => Command::Backups,
        "connections" => Command::Connections,
        "meta" => Command::Meta {
            name: name.next().context("'meta' requires a backup name")?,
        },
        "remove" => Command::Remove {
            name: name.next().context("'remove' requires a backup name")?,
        },
        other => anyhow::bail!("Unknown command '{other}'\n{}", usage()),
    };

    Ok(Cli {
        config_file,
        connection,
        command,
    })
}
