use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use relay_plan::{Plan, VersionChange};
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StateError};

/// Versions already published, per package.
/// Format:
/// ```toml
/// [published]
/// "@scope/lib" = ["1.0.0", "1.1.0"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishState {
    #[serde(default)]
    published: BTreeMap<String, BTreeSet<Version>>,
}

impl PublishState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads state from `path`; a missing file is an empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no publish state, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| StateError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns `false` if the version was already recorded.
    pub fn record(&mut self, name: impl Into<String>, version: Version) -> bool {
        self.published.entry(name.into()).or_default().insert(version)
    }

    #[must_use]
    pub fn is_published(&self, name: &str, version: &Version) -> bool {
        self.published
            .get(name)
            .is_some_and(|versions| versions.contains(version))
    }

    /// Plan entries still to publish, in publishing order.
    #[must_use]
    pub fn pending<'a>(&self, plan: &'a Plan) -> Vec<&'a VersionChange> {
        plan.ordered_changes()
            .filter(|change| !self.is_published(&change.name, &change.to_version))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.published.len()
    }
}
