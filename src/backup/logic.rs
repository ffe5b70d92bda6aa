use chrono::Local;
use mongodb::Client;
use tracing::{debug, warn};

use crate::config::{ConfigStore, Connection};
use crate::errors::Result;
use crate::metadata::{self, BackupMetadata, CollectionMetadata, DatabaseMetadata};
use crate::names;
use crate::server;
use crate::utils::fs::{ensure_directory, list_subdirectories};

use super::db_dump;

#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub message: Option<String>,
    pub databases: Option<Vec<String>>,
    pub collections: Option<Vec<String>>,
}

/// Applies the caller's database selection over the live list and removes
/// the administrative `local` database unconditionally.
fn resolve_working_databases(requested: Option<&[String]>, live: &[String]) -> Vec<String> {
    let mut databases = match requested {
        Some(requested) => requested.to_vec(),
        None => live.to_vec(),
    };
    databases.retain(|db| db != "local");
    databases
}

/// Records live per-database/per-collection document counts for the working
/// sets. Databases that end up with no collection entries are dropped.
async fn build_metadata(
    client: &Client,
    connection: &Connection,
    name: &str,
    message: Option<String>,
    databases: &[String],
    collections: Option<&[String]>,
) -> Result<BackupMetadata> {
    let mut entries = Vec::new();

    for database in databases {
        let targets = match collections {
            Some(collections) => collections.to_vec(),
            None => server::collection_names(client, database).await?,
        };

        let mut collection_entries = Vec::new();
        for collection in &targets {
            collection_entries.push(CollectionMetadata {
                name: collection.clone(),
                document_count: server::document_count(client, database, collection).await?,
            });
        }

        if !collection_entries.is_empty() {
            entries.push(DatabaseMetadata {
                name: database.clone(),
                collections: collection_entries,
            });
        }
    }

    Ok(BackupMetadata {
        name: name.to_string(),
        host: connection.host.clone().unwrap_or_default(),
        port: connection.port.unwrap_or_default(),
        date: Local::now().to_rfc3339(),
        message,
        databases: entries,
    })
}

/// Creates one backup for the active connection and returns its generated
/// name. Completed dumps are left on disk if a later invocation fails.
pub async fn perform_backup(config: &ConfigStore, options: &BackupOptions) -> Result<String> {
    let connection = config.connection()?.clone();

    let root = config.root();
    if !root.exists() {
        ensure_directory(&root)?;
        debug!(path = %root.display(), "root directory created");
    }

    let connection_dir = config.connection_dir()?;
    if !connection_dir.exists() {
        ensure_directory(&connection_dir)?;
        debug!(path = %connection_dir.display(), "connection directory created");
    }

    let existing = list_subdirectories(&connection_dir)?;
    let name = names::unique_backup_name(&existing)?;
    let backup_dir = connection_dir.join(&name);
    ensure_directory(&backup_dir)?;

    let client = server::connect(&connection).await?;
    let all_databases = server::database_names(&client).await?;
    let databases = resolve_working_databases(options.databases.as_deref(), &all_databases);

    let built = build_metadata(
        &client,
        &connection,
        &name,
        options.message.clone(),
        &databases,
        options.collections.as_deref(),
    )
    .await?;
    metadata::write(&backup_dir, &built)?;

    for database in &databases {
        if !all_databases.contains(database) {
            warn!(database = %database, "database does not exist");
        }

        match options.collections.as_deref() {
            None => db_dump::run_dump(&connection, database, None, &backup_dir)?,
            Some(collections) => {
                let live_collections = server::collection_names(&client, database).await?;
                for collection in collections {
                    if !live_collections.contains(collection) {
                        warn!(
                            collection = %collection,
                            database = %database,
                            "collection does not exist in database"
                        );
                    }
                    db_dump::run_dump(&connection, database, Some(collection.as_str()), &backup_dir)?;
                }
            }
        }
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> Vec<String> {
        vec!["local".to_string(), "d1".to_string(), "d2".to_string()]
    }

    #[test]
    fn test_resolve_working_databases_defaults_to_live() {
        assert_eq!(resolve_working_databases(None, &live()), vec!["d1", "d2"]);
    }

    #[test]
    fn test_resolve_working_databases_removes_local_from_request() {
        let requested = vec!["local".to_string(), "d1".to_string()];
        assert_eq!(
            resolve_working_databases(Some(&requested), &live()),
            vec!["d1"]
        );
    }

    #[test]
    fn test_resolve_working_databases_keeps_unknown_names() {
        // a database missing from the live server is still dumped, with a warning
        let requested = vec!["ghost".to_string()];
        assert_eq!(
            resolve_working_databases(Some(&requested), &live()),
            vec!["ghost"]
        );
    }
}
