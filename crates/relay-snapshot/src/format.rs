use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// # Errors
    ///
    /// Returns `SnapshotError::UnsupportedFormat` for anything but `.json` or
    /// `.toml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(SnapshotError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns a parse error carrying `path` if `content` does not describe a `T`.
    pub fn parse<T: DeserializeOwned>(self, content: &str, path: &Path) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|source| SnapshotError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Self::Toml => toml::from_str(content).map_err(|source| SnapshotError::Toml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Reads and parses a JSON or TOML file chosen by extension.
///
/// # Errors
///
/// Returns an error if the extension is unsupported, the file cannot be read,
/// or its content does not parse.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content, path)
}
