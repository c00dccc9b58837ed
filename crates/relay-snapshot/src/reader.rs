use std::path::{Path, PathBuf};

use relay_core::Package;
use tracing::debug;

use crate::error::Result;
use crate::format::read_file;

/// Loads one repository's package record.
pub trait RecordReader: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or parsed.
    fn read_record(&self, path: &Path) -> Result<Package>;
}

/// Reads JSON or TOML records relative to a base directory.
pub struct FileSystemRecordReader {
    base_dir: PathBuf,
}

impl FileSystemRecordReader {
    #[must_use]
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl RecordReader for FileSystemRecordReader {
    fn read_record(&self, path: &Path) -> Result<Package> {
        let full_path = self.resolve_path(path);
        debug!(path = %full_path.display(), "reading package record");
        read_file(&full_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_relative_record_from_base_dir() {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(
            dir.path().join("lib.json"),
            r#"{ "name": "lib", "version": "1.4.0" }"#,
        )
        .expect("write record");
        let reader = FileSystemRecordReader::new(dir.path());

        let package = reader.read_record(Path::new("lib.json")).expect("read record");

        assert_eq!(package.name, "lib");
        assert_eq!(package.version, "1.4.0");
    }

    #[test]
    fn absolute_paths_ignore_base_dir() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("app.toml");
        fs::write(&path, "name = \"app\"\nversion = \"0.1.0\"\n").expect("write record");
        let reader = FileSystemRecordReader::new(Path::new("/nonexistent"));

        let package = reader.read_record(&path).expect("read record");

        assert_eq!(package.name, "app");
    }

    #[test]
    fn missing_record_is_read_error() {
        let dir = TempDir::new().expect("create temp dir");
        let reader = FileSystemRecordReader::new(dir.path());

        let err = reader
            .read_record(Path::new("missing.json"))
            .expect_err("missing record must fail");

        assert!(matches!(err, SnapshotError::Read { .. }));
    }
}
