use std::fs;
use std::path::PathBuf;

use crate::config::ConfigStore;
use crate::errors::{AppError, Result};
use crate::utils::fs::list_subdirectories;

/// Subdirectories of the storage root, one per connection socket.
/// Empty when the root does not exist yet.
pub fn connection_directories(config: &ConfigStore) -> Result<Vec<String>> {
    let root = config.root();
    if !root.exists() {
        return Ok(Vec::new());
    }
    list_subdirectories(&root)
}

/// Connection directories paired with the number of backups under each.
pub fn connection_directories_with_counts(config: &ConfigStore) -> Result<Vec<(String, usize)>> {
    let root = config.root();
    let mut directories = Vec::new();
    for name in connection_directories(config)? {
        let count = list_subdirectories(&root.join(&name))?.len();
        directories.push((name, count));
    }
    Ok(directories)
}

/// Backup names for the active connection. Empty when its directory does
/// not exist yet.
pub fn backups(config: &ConfigStore) -> Result<Vec<String>> {
    let dir = config.connection_dir()?;
    if !dir.exists() {
        return Ok(Vec::new());
    }
    list_subdirectories(&dir)
}

/// Path of a named backup under the active connection's directory.
pub fn backup_dir(config: &ConfigStore, name: &str) -> Result<PathBuf> {
    Ok(config.connection_dir()?.join(name))
}

/// Recursively deletes a backup. Irreversible, no trash or undo.
pub fn remove_backup(config: &ConfigStore, name: &str) -> Result<()> {
    let path = backup_dir(config, name)?;
    if !path.exists() {
        return Err(AppError::BackupNotFound(name.to_string()));
    }
    fs::remove_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLayer;

    fn store_at(root: &std::path::Path) -> ConfigStore {
        let mut config = ConfigStore::new();
        config.add(ConfigLayer {
            root: Some(root.to_string_lossy().into_owned()),
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_connection_directories_without_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(&dir.path().join("missing"));
        assert!(connection_directories(&config).unwrap().is_empty());
    }

    #[test]
    fn test_connection_directories_with_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(dir.path());

        let conn_dir = config.connection_dir().unwrap();
        fs::create_dir_all(conn_dir.join("drift-acorn")).unwrap();
        fs::create_dir_all(conn_dir.join("hum-raven")).unwrap();

        let listed = connection_directories_with_counts(&config).unwrap();
        assert_eq!(listed, vec![("localhost:27017".to_string(), 2)]);
    }

    #[test]
    fn test_backups_without_connection_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(dir.path());
        assert!(backups(&config).unwrap().is_empty());
    }

    #[test]
    fn test_backups_lists_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(dir.path());
        fs::create_dir_all(config.connection_dir().unwrap().join("drift-acorn")).unwrap();

        assert_eq!(backups(&config).unwrap(), vec!["drift-acorn"]);
    }

    #[test]
    fn test_remove_backup_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(dir.path());

        assert!(matches!(
            remove_backup(&config, "missing"),
            Err(AppError::BackupNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_remove_backup_deletes_recursively() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = store_at(dir.path());
        let backup = config.connection_dir().unwrap().join("drift-acorn");
        fs::create_dir_all(backup.join("d1")).unwrap();
        fs::write(backup.join("metadata.json"), "{}").unwrap();

        remove_backup(&config, "drift-acorn").unwrap();
        assert!(!backup.exists());
    }
}
