use std::fs;
use std::path::Path;

use crate::errors::Result;

/// Returns the immediate subdirectory names of `path`, not recursive.
/// Sorted for stable output; underlying I/O failures propagate.
pub fn list_subdirectories(path: &Path) -> Result<Vec<String>> {
    let mut directories = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            directories.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    directories.sort();
    Ok(directories)
}

/// Creates `path` and all missing parents.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_subdirectories_skips_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("file.txt"), "x").unwrap();

        assert_eq!(list_subdirectories(dir.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_subdirectories_missing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(list_subdirectories(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_ensure_directory_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
