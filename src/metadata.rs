use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Connection;
use crate::errors::Result;

pub const METADATA_FILE: &str = "metadata.json";

const MISSING_DATE: &str = "0001-01-01T00:00:00";
const MISSING_MESSAGE: &str = "Metadata not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    pub document_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub name: String,
    pub collections: Vec<CollectionMetadata>,
}

impl DatabaseMetadata {
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }
}

/// The sidecar record written once at backup creation and read-only after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub date: String,
    pub message: Option<String>,
    pub databases: Vec<DatabaseMetadata>,
}

impl BackupMetadata {
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.iter().map(|d| d.name.as_str()).collect()
    }

    /// Placeholder returned when a backup has no sidecar file.
    fn missing(name: &str, connection: &Connection) -> Self {
        Self {
            name: name.to_string(),
            host: connection.host.clone().unwrap_or_default(),
            port: connection.port.unwrap_or_default(),
            date: MISSING_DATE.to_string(),
            message: Some(MISSING_MESSAGE.to_string()),
            databases: Vec::new(),
        }
    }
}

/// Serializes `metadata` to `<backup_dir>/metadata.json`, overwriting any
/// existing file.
pub fn write(backup_dir: &Path, metadata: &BackupMetadata) -> Result<()> {
    let text = serde_json::to_string_pretty(metadata)?;
    fs::write(backup_dir.join(METADATA_FILE), text)?;
    Ok(())
}

/// Reads the sidecar for a backup directory. A missing file yields the
/// placeholder record; any other I/O or parse failure propagates.
pub fn read(backup_dir: &Path, connection: &Connection) -> Result<BackupMetadata> {
    let path = backup_dir.join(METADATA_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let name = backup_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(BackupMetadata::missing(&name, connection))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionLayer;
    use crate::errors::AppError;

    fn connection() -> Connection {
        Connection::from_layer(
            "default",
            &ConnectionLayer {
                host: Some("localhost".into()),
                port: Some(27017),
                ..Default::default()
            },
        )
    }

    fn sample() -> BackupMetadata {
        BackupMetadata {
            name: "drift-acorn".into(),
            host: "localhost".into(),
            port: 27017,
            date: "2024-05-01T12:00:00+00:00".into(),
            message: Some("pre-migration".into()),
            databases: vec![DatabaseMetadata {
                name: "d1".into(),
                collections: vec![CollectionMetadata {
                    name: "c1".into(),
                    document_count: 3,
                }],
            }],
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let metadata = sample();
        write(dir.path(), &metadata).unwrap();

        let loaded = read(dir.path(), &connection()).unwrap();
        assert_eq!(loaded, metadata);
        assert_eq!(loaded.database_names(), vec!["d1"]);
        assert_eq!(loaded.databases[0].collection_names(), vec!["c1"]);
    }

    #[test]
    fn test_read_missing_returns_placeholder() {
        let dir = tempfile::TempDir::new().unwrap();
        let backup_dir = dir.path().join("gone-raven");

        let loaded = read(&backup_dir, &connection()).unwrap();
        assert_eq!(loaded.name, "gone-raven");
        assert_eq!(loaded.host, "localhost");
        assert_eq!(loaded.port, 27017);
        assert_eq!(loaded.date, MISSING_DATE);
        assert_eq!(loaded.message.as_deref(), Some(MISSING_MESSAGE));
        assert!(loaded.databases.is_empty());
    }

    #[test]
    fn test_read_malformed_propagates() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{not json").unwrap();

        assert!(matches!(
            read(dir.path(), &connection()),
            Err(AppError::Json(_))
        ));
    }
}
