use crate::config::ConfigStore;
use crate::errors::{AppError, Result};
use crate::metadata::{self, BackupMetadata};
use crate::storage;

use super::db_restore;

#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub name: String,
    pub databases: Option<Vec<String>>,
    pub collections: Option<Vec<String>>,
    pub destination_databases: Option<Vec<String>>,
    pub destination_connection: Option<String>,
}

fn validate_databases(
    requested: Option<&[String]>,
    recorded: &BackupMetadata,
    backup: &str,
) -> Result<()> {
    if let Some(requested) = requested {
        let known = recorded.database_names();
        for database in requested {
            if !known.contains(&database.as_str()) {
                return Err(AppError::DatabaseNotFoundInBackup(
                    database.clone(),
                    backup.to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Every requested collection must appear in every recorded database entry.
fn validate_collections(
    requested: Option<&[String]>,
    recorded: &BackupMetadata,
    backup: &str,
) -> Result<()> {
    if let Some(requested) = requested {
        for database in &recorded.databases {
            let known = database.collection_names();
            for collection in requested {
                if !known.contains(&collection.as_str()) {
                    return Err(AppError::CollectionNotFoundInBackup(
                        collection.clone(),
                        database.name.clone(),
                        backup.to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_destination_databases(sources: usize, destinations: Option<&[String]>) -> Result<()> {
    if let Some(destinations) = destinations {
        if sources != destinations.len() {
            return Err(AppError::DestinationDatabasesLength {
                expected: sources,
                got: destinations.len(),
            });
        }
    }
    Ok(())
}

fn namespace(database: &str, collection: Option<&str>) -> String {
    match collection {
        Some(collection) => format!("{database}.{collection}"),
        None => format!("{database}.*"),
    }
}

/// Restores a named backup. All validation against the recorded metadata
/// happens before the first external invocation; partially restored data is
/// left in place if a later invocation fails.
pub fn perform_restore(config: &ConfigStore, options: &RestoreOptions) -> Result<()> {
    let backup_dir = storage::backup_dir(config, &options.name)?;
    if !backup_dir.exists() {
        return Err(AppError::BackupNotFound(options.name.clone()));
    }

    let connection = config.connection()?;
    let recorded = metadata::read(&backup_dir, connection)?;

    validate_databases(options.databases.as_deref(), &recorded, &options.name)?;
    validate_collections(options.collections.as_deref(), &recorded, &options.name)?;

    let sources: Vec<String> = match &options.databases {
        Some(databases) => databases.clone(),
        None => recorded.database_names().iter().map(|n| n.to_string()).collect(),
    };
    validate_destination_databases(sources.len(), options.destination_databases.as_deref())?;

    let destination = match &options.destination_connection {
        Some(name) => config.registry().get(name)?,
        None => connection,
    };

    for (i, database) in sources.iter().enumerate() {
        let destination_database = options
            .destination_databases
            .as_ref()
            .map(|destinations| destinations[i].as_str());

        // the dump tree is nested under the source database name only when
        // remapping into a destination database
        let source_dir = match destination_database {
            Some(_) => backup_dir.join(database),
            None => backup_dir.clone(),
        };

        match options.collections.as_deref() {
            None => db_restore::run_restore(
                destination,
                destination_database,
                &namespace(database, None),
                &source_dir,
            )?,
            Some(collections) => {
                for collection in collections {
                    db_restore::run_restore(
                        destination,
                        destination_database,
                        &namespace(database, Some(collection.as_str())),
                        &source_dir,
                    )?;
                }
            }
        }
    }

    Ok(())
}
