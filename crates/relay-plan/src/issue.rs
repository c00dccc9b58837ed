use std::fmt;

use relay_core::RepositoryRef;
use serde::Serialize;

/// A non-fatal failure recorded on the plan.
///
/// Each variant keeps the structured data that produced it; rendering is left
/// to the report layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlanIssue {
    UnresolvedRepository {
        repository: RepositoryRef,
        reason: String,
    },
    InvalidVersion {
        package: String,
        version: String,
        reason: String,
    },
    InvalidRange {
        package: String,
        dependency: String,
        range: String,
        reason: String,
    },
    UnknownChangeTarget {
        target: String,
        source_package: String,
    },
    CyclicDependency {
        members: Vec<String>,
        blocked: Vec<String>,
    },
}

impl PlanIssue {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedRepository { .. } => "UnresolvedRepository",
            Self::InvalidVersion { .. } => "InvalidVersion",
            Self::InvalidRange { .. } => "InvalidRange",
            Self::UnknownChangeTarget { .. } => "UnknownChangeTarget",
            Self::CyclicDependency { .. } => "CyclicDependency",
        }
    }
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedRepository { repository, reason } => {
                write!(f, "repository '{repository}' could not be resolved: {reason}")
            }
            Self::InvalidVersion {
                package,
                version,
                reason,
            } => write!(f, "package '{package}' has invalid version '{version}': {reason}"),
            Self::InvalidRange {
                package,
                dependency,
                range,
                reason,
            } => write!(
                f,
                "package '{package}' declares invalid range '{range}' for '{dependency}': {reason}"
            ),
            Self::UnknownChangeTarget {
                target,
                source_package,
            } => write!(
                f,
                "change record in '{source_package}' targets unknown package '{target}'"
            ),
            Self::CyclicDependency { members, blocked } => {
                write!(f, "dependency cycle between {}", members.join(", "))?;
                if !blocked.is_empty() {
                    write!(f, " (blocks {})", blocked.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// A stage result together with the issues raised while producing it.
#[derive(Debug, Clone)]
pub struct Staged<T> {
    pub value: T,
    pub issues: Vec<PlanIssue>,
}

impl<T> Staged<T> {
    pub fn new(value: T, issues: Vec<PlanIssue>) -> Self {
        Self { value, issues }
    }
}
