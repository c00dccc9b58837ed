use std::path::{Path, PathBuf};

use relay_core::{Package, RepositoryRef, UnresolvedRepository};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::read_file;

/// A snapshot as written to disk: repositories listed inline or by record
/// file, plus repositories the collector already failed to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotManifest {
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositoryEntry {
    /// A package record stored in its own JSON or TOML file. Relative paths
    /// are resolved against the manifest's directory.
    Record {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repository: Option<RepositoryRef>,
    },
    Inline(Package),
}

impl RepositoryEntry {
    #[must_use]
    pub fn record(path: impl Into<PathBuf>) -> Self {
        Self::Record {
            path: path.into(),
            repository: None,
        }
    }

    /// The repository this entry is reported under when it fails to resolve.
    #[must_use]
    pub fn repository(&self) -> RepositoryRef {
        match self {
            Self::Record {
                repository: Some(repository),
                ..
            } => repository.clone(),
            Self::Record { path, .. } => RepositoryRef::new(path.display().to_string()),
            Self::Inline(package) => package
                .repository
                .clone()
                .unwrap_or_else(|| RepositoryRef::new(package.name.clone())),
        }
    }
}

impl SnapshotManifest {
    /// # Errors
    ///
    /// Returns an error if the file has an unsupported extension, cannot be
    /// read, or does not parse as a manifest.
    pub fn load(path: &Path) -> Result<Self> {
        read_file(path)
    }

    #[must_use]
    pub fn with_entry(mut self, entry: RepositoryEntry) -> Self {
        self.repositories.push(entry);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
