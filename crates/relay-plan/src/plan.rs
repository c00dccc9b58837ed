use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use relay_core::{DependencyKind, UnresolvedRepository};
use serde::Serialize;

use crate::calculator::VersionChange;
use crate::graph::DependencyGraph;
use crate::issue::{PlanIssue, Staged};
use crate::resolver::Resolution;

/// Why a snapshot package has no version change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum InfoReason {
    #[serde(rename = "no changes")]
    NoChanges,
    #[serde(rename = "dev-dependency-only changes")]
    DevDependencyOnly,
    #[serde(rename = "peer-dependency-only changes")]
    PeerDependencyOnly,
    #[serde(rename = "dependency changes within declared ranges")]
    WithinDeclaredRanges,
    #[serde(rename = "invalid version")]
    InvalidVersion,
}

impl fmt::Display for InfoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoChanges => "no changes",
            Self::DevDependencyOnly => "dev-dependency-only changes",
            Self::PeerDependencyOnly => "peer-dependency-only changes",
            Self::WithinDeclaredRanges => "dependency changes within declared ranges",
            Self::InvalidVersion => "invalid version",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoEntry {
    pub name: String,
    pub reason: InfoReason,
}

/// The publishing plan for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Changed packages, dependencies before dependents.
    pub publishing_order: Vec<String>,
    /// One entry per changed package, ascending by name.
    pub version_changes: Vec<VersionChange>,
    /// Major-bumped package to its transitively affected dependents.
    pub breaking_cascades: BTreeMap<String, BTreeSet<String>>,
    /// Unchanged packages, ascending by name.
    pub info: Vec<InfoEntry>,
    pub errors: Vec<PlanIssue>,
}

impl Plan {
    #[must_use]
    pub fn version_change(&self, name: &str) -> Option<&VersionChange> {
        self.version_changes.iter().find(|change| change.name == name)
    }

    #[must_use]
    pub fn info_reason(&self, name: &str) -> Option<InfoReason> {
        self.info
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.reason)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Version changes in publishing order; entries left out of the order
    /// (cycle members and the packages they block) are skipped.
    pub fn ordered_changes(&self) -> impl Iterator<Item = &VersionChange> {
        self.publishing_order
            .iter()
            .filter_map(|name| self.version_change(name))
    }
}

/// Inputs the assembler merges, one per upstream stage.
pub struct PlanParts<'a> {
    pub graph: &'a DependencyGraph,
    pub unresolved: &'a [UnresolvedRepository],
    pub resolution: Staged<Resolution>,
    pub version_changes: Vec<VersionChange>,
    pub breaking_cascades: BTreeMap<String, BTreeSet<String>>,
    pub sequence: Staged<Vec<String>>,
}

pub struct PlanAssembler;

impl PlanAssembler {
    #[must_use]
    pub fn assemble(parts: PlanParts<'_>) -> Plan {
        let PlanParts {
            graph,
            unresolved,
            resolution,
            version_changes,
            breaking_cascades,
            sequence,
        } = parts;

        let changed: BTreeSet<&str> = version_changes.iter().map(|c| c.name.as_str()).collect();
        let info = graph
            .names()
            .filter(|name| !changed.contains(name))
            .map(|name| InfoEntry {
                name: name.to_string(),
                reason: Self::info_reason(name, &resolution.value),
            })
            .collect();

        let mut errors: Vec<PlanIssue> = unresolved
            .iter()
            .map(|repo| PlanIssue::UnresolvedRepository {
                repository: repo.repository.clone(),
                reason: repo.reason.clone(),
            })
            .collect();
        errors.extend(resolution.issues);
        errors.extend(sequence.issues);

        Plan {
            publishing_order: sequence.value,
            version_changes,
            breaking_cascades,
            info,
            errors,
        }
    }

    fn info_reason(name: &str, resolution: &Resolution) -> InfoReason {
        if resolution.invalid_versions.contains(name) {
            return InfoReason::InvalidVersion;
        }
        let Some(activity) = resolution.upstream_activity.get(name) else {
            return InfoReason::NoChanges;
        };

        if activity.contains(&DependencyKind::Production) {
            InfoReason::WithinDeclaredRanges
        } else if activity.contains(&DependencyKind::Development) {
            InfoReason::DevDependencyOnly
        } else if activity.contains(&DependencyKind::Peer) {
            InfoReason::PeerDependencyOnly
        } else {
            InfoReason::NoChanges
        }
    }
}
