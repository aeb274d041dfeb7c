//! Filesystem-backed storage adapter.

use std::path::{Path, PathBuf};

use filevault_common::paths::normalize_path;
use filevault_common::{Error, Result};

use super::StorageAdapter;

/// Stores files under `{root}/{relative path}`.
pub struct LocalAdapter {
    name: String,
    root: PathBuf,
}

impl LocalAdapter {
    /// Create a new `LocalAdapter` with the given tag and root directory.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative storage path below the root.
    ///
    /// Parent-directory segments are rejected so a crafted path cannot escape
    /// the root.
    fn full_path(&self, path: &str) -> Result<PathBuf> {
        let relative = normalize_path(path);
        if relative.is_empty() {
            return Err(Error::invalid_argument("storage path must not be empty"));
        }
        if relative.split('/').any(|segment| segment == "..") {
            return Err(Error::invalid_argument(format!(
                "storage path escapes adapter root: {path}"
            )));
        }
        Ok(relative
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }

    fn io_error(&self, action: &str, path: &Path, err: std::io::Error) -> Error {
        Error::storage(&self.name, format!("failed to {action} {}: {err}", path.display()))
    }
}

impl StorageAdapter for LocalAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path)?;
        std::fs::read(&full_path).map_err(|e| self.io_error("read", &full_path, e))
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error("create", parent, e))?;
        }

        std::fs::write(&full_path, content).map_err(|e| self.io_error("write", &full_path, e))
    }

    fn delete(&self, path: &str) -> Result<bool> {
        let full_path = self.full_path(path)?;
        match std::fs::remove_file(&full_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error("delete", &full_path, e)),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.full_path(path)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = LocalAdapter::new("Local", dir.path());

        adapter.write("Avatar/ab/cd/1/thumb", b"bytes").unwrap();
        assert!(dir.path().join("Avatar/ab/cd/1/thumb").exists());
        assert!(adapter.exists("Avatar/ab/cd/1/thumb").unwrap());
        assert_eq!(adapter.read("Avatar/ab/cd/1/thumb").unwrap(), b"bytes");

        assert!(adapter.delete("Avatar/ab/cd/1/thumb").unwrap());
        assert!(!adapter.exists("Avatar/ab/cd/1/thumb").unwrap());
        assert!(!adapter.delete("Avatar/ab/cd/1/thumb").unwrap());
    }

    #[test]
    fn test_backslash_paths() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = LocalAdapter::new("Local", dir.path());
        adapter.write("a\\b\\c.txt", b"x").unwrap();
        assert!(dir.path().join("a").join("b").join("c.txt").exists());
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = LocalAdapter::new("Local", dir.path());
        assert!(matches!(
            adapter.write("../escape.txt", b"x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(adapter.read(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_read_missing_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = LocalAdapter::new("Local", dir.path());
        let err = adapter.read("missing").unwrap_err();
        assert!(matches!(err, Error::Storage { ref adapter, .. } if adapter == "Local"));
    }
}
