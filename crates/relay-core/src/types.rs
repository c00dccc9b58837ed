use std::fmt;

use clap::ValueEnum;
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

/// Where a change record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrigin {
    /// Authored by a human and found on disk.
    #[default]
    Explicit,
    /// Generated because an upstream bump broke a declared range.
    Inferred,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Inferred => write!(f, "inferred"),
        }
    }
}

/// A request to bump `target` by `bump_type`.
///
/// An empty `target` refers to the package whose repository carried the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default)]
    pub target: String,
    pub bump_type: BumpType,
    #[serde(default)]
    pub origin: ChangeOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChangeRecord {
    #[must_use]
    pub fn explicit(target: impl Into<String>, bump_type: BumpType) -> Self {
        Self {
            target: target.into(),
            bump_type,
            origin: ChangeOrigin::Explicit,
            description: None,
        }
    }

    #[must_use]
    pub fn inferred(target: impl Into<String>, bump_type: BumpType) -> Self {
        Self {
            target: target.into(),
            bump_type,
            origin: ChangeOrigin::Inferred,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.origin == ChangeOrigin::Explicit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Production,
    Development,
    Peer,
}

impl DependencyKind {
    pub const ALL: [Self; 3] = [Self::Production, Self::Development, Self::Peer];
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Peer => "peer",
        };
        write!(f, "{s}")
    }
}

/// Opaque reference to the repository a package was read from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryRef(String);

impl RepositoryRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One resolved repository's package, as read by the snapshot collaborator.
///
/// The version is kept as written in the manifest so that a malformed value
/// can be reported per package instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    #[serde(
        default,
        alias = "devDependencies",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(
        default,
        alias = "peerDependencies",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryRef>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
            peer_dependencies: IndexMap::new(),
            changes: Vec::new(),
            repository: None,
        }
    }

    #[must_use]
    pub fn with_dependency(
        mut self,
        kind: DependencyKind,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        let map = match kind {
            DependencyKind::Production => &mut self.dependencies,
            DependencyKind::Development => &mut self.dev_dependencies,
            DependencyKind::Peer => &mut self.peer_dependencies,
        };
        map.insert(name.into(), range.into());
        self
    }

    /// Adds an explicit change record targeting this package.
    #[must_use]
    pub fn with_change(mut self, bump_type: BumpType) -> Self {
        let record = ChangeRecord::explicit(self.name.clone(), bump_type);
        self.changes.push(record);
        self
    }

    #[must_use]
    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn dependency_map(&self, kind: DependencyKind) -> &IndexMap<String, String> {
        match kind {
            DependencyKind::Production => &self.dependencies,
            DependencyKind::Development => &self.dev_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
        }
    }

    #[must_use]
    pub fn declared_range(&self, dependency: &str, kind: DependencyKind) -> Option<&str> {
        self.dependency_map(kind).get(dependency).map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidVersion` if the manifest version is not a
    /// well-formed semantic version.
    pub fn parsed_version(&self) -> Result<Version, CoreError> {
        Version::parse(self.version.trim()).map_err(|source| CoreError::InvalidVersion {
            package: self.name.clone(),
            version: self.version.clone(),
            source,
        })
    }
}

/// A repository the snapshot collaborator could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedRepository {
    pub repository: RepositoryRef,
    pub reason: String,
}

/// Fully resolved input to the planning engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSnapshot {
    #[serde(default)]
    pub resolved: Vec<Package>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedRepository>,
}

impl PackageSnapshot {
    #[must_use]
    pub fn new(resolved: Vec<Package>) -> Self {
        Self {
            resolved,
            unresolved: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_unresolved(mut self, unresolved: UnresolvedRepository) -> Self {
        self.unresolved.push(unresolved);
        self
    }
}
