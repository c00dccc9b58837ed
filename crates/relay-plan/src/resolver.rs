use std::collections::{BTreeMap, BTreeSet};
use std::error::Error as _;

use relay_core::{BumpType, ChangeOrigin, ChangeRecord, DependencyKind};
use relay_version::{DeclaredRange, bump_version};
use semver::Version;
use tracing::{debug, warn};

use crate::graph::DependencyGraph;
use crate::issue::{PlanIssue, Staged};
use crate::policy::PlanPolicy;

/// Effective change records per package plus the bookkeeping later stages need.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Explicit records followed by at most one inferred record, for every
    /// package with a valid version and at least one record.
    pub records: BTreeMap<String, Vec<ChangeRecord>>,
    pub current_versions: BTreeMap<String, Version>,
    /// Dependency kinds through which each package saw an upstream bump.
    pub upstream_activity: BTreeMap<String, BTreeSet<DependencyKind>>,
    pub invalid_versions: BTreeSet<String>,
}

impl Resolution {
    #[must_use]
    pub fn records_for(&self, name: &str) -> &[ChangeRecord] {
        self.records.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Attaches explicit records to their targets and infers records for
/// dependents whose declared production ranges an upstream bump breaks.
pub struct ChangeRecordResolver<'a> {
    graph: &'a DependencyGraph,
    policy: &'a PlanPolicy,
}

struct ResolverState {
    versions: BTreeMap<String, Version>,
    explicit: BTreeMap<String, Vec<ChangeRecord>>,
    ranges: BTreeMap<(String, String), DeclaredRange>,
    bumps: BTreeMap<String, BumpType>,
    inferred: BTreeMap<String, ChangeRecord>,
}

impl<'a> ChangeRecordResolver<'a> {
    #[must_use]
    pub fn new(graph: &'a DependencyGraph, policy: &'a PlanPolicy) -> Self {
        Self { graph, policy }
    }

    #[must_use]
    pub fn resolve(&self) -> Staged<Resolution> {
        let mut issues = Vec::new();
        let (versions, invalid_versions) = self.parse_versions(&mut issues);
        let explicit = self.route_explicit_records(&invalid_versions, &mut issues);
        let ranges = self.parse_production_ranges(&mut issues);

        let bumps = explicit
            .iter()
            .filter_map(|(name, records)| {
                records
                    .iter()
                    .map(|r| r.bump_type)
                    .max()
                    .map(|bump| (name.clone(), bump))
            })
            .collect();

        let mut state = ResolverState {
            versions,
            explicit,
            ranges,
            bumps,
            inferred: BTreeMap::new(),
        };
        self.propagate(&mut state, &invalid_versions);

        let upstream_activity = self.upstream_activity(&state.bumps);

        let mut records = BTreeMap::new();
        for name in self.graph.names() {
            if invalid_versions.contains(name) {
                continue;
            }
            let mut effective = state.explicit.remove(name).unwrap_or_default();
            if let Some(record) = state.inferred.remove(name) {
                effective.push(record);
            }
            if !effective.is_empty() {
                records.insert(name.to_string(), effective);
            }
        }

        Staged::new(
            Resolution {
                records,
                current_versions: state.versions,
                upstream_activity,
                invalid_versions,
            },
            issues,
        )
    }

    fn parse_versions(
        &self,
        issues: &mut Vec<PlanIssue>,
    ) -> (BTreeMap<String, Version>, BTreeSet<String>) {
        let mut versions = BTreeMap::new();
        let mut invalid = BTreeSet::new();

        for package in self.graph.packages() {
            match package.parsed_version() {
                Ok(version) => {
                    versions.insert(package.name.clone(), version);
                }
                Err(err) => {
                    let reason = err
                        .source()
                        .map_or_else(|| err.to_string(), ToString::to_string);
                    warn!(package = %package.name, version = %package.version, "invalid package version");
                    issues.push(PlanIssue::InvalidVersion {
                        package: package.name.clone(),
                        version: package.version.clone(),
                        reason,
                    });
                    invalid.insert(package.name.clone());
                }
            }
        }

        (versions, invalid)
    }

    fn route_explicit_records(
        &self,
        invalid_versions: &BTreeSet<String>,
        issues: &mut Vec<PlanIssue>,
    ) -> BTreeMap<String, Vec<ChangeRecord>> {
        let mut explicit: BTreeMap<String, Vec<ChangeRecord>> = BTreeMap::new();

        for package in self.graph.packages() {
            for record in &package.changes {
                let target = if record.target.is_empty() {
                    package.name.as_str()
                } else {
                    record.target.as_str()
                };

                if !self.graph.contains(target) {
                    warn!(change_target = target, source = %package.name, "change record targets unknown package");
                    issues.push(PlanIssue::UnknownChangeTarget {
                        target: target.to_string(),
                        source_package: package.name.clone(),
                    });
                    continue;
                }
                if invalid_versions.contains(target) {
                    continue;
                }

                explicit
                    .entry(target.to_string())
                    .or_default()
                    .push(ChangeRecord {
                        target: target.to_string(),
                        origin: ChangeOrigin::Explicit,
                        ..record.clone()
                    });
            }
        }

        explicit
    }

    fn parse_production_ranges(
        &self,
        issues: &mut Vec<PlanIssue>,
    ) -> BTreeMap<(String, String), DeclaredRange> {
        let mut ranges = BTreeMap::new();

        for edge in self.graph.edges() {
            if edge.kind != DependencyKind::Production {
                continue;
            }
            let Some(raw) = self
                .graph
                .package(&edge.dependent)
                .and_then(|p| p.declared_range(&edge.dependency, DependencyKind::Production))
            else {
                continue;
            };

            match DeclaredRange::parse(raw) {
                Ok(range) => {
                    ranges.insert((edge.dependent.clone(), edge.dependency.clone()), range);
                }
                Err(err) => {
                    let reason = err
                        .source()
                        .map_or_else(|| err.to_string(), ToString::to_string);
                    warn!(package = %edge.dependent, dependency = %edge.dependency, range = raw, "invalid dependency range");
                    issues.push(PlanIssue::InvalidRange {
                        package: edge.dependent.clone(),
                        dependency: edge.dependency.clone(),
                        range: raw.to_string(),
                        reason,
                    });
                }
            }
        }

        ranges
    }

    /// Raises dependents until no bump changes. Bumps and inferred records only
    /// ever rise, so this terminates.
    fn propagate(&self, state: &mut ResolverState, invalid_versions: &BTreeSet<String>) {
        let mut worklist: BTreeSet<String> = state.bumps.keys().cloned().collect();

        while let Some(changed) = worklist.pop_first() {
            for edge in self.graph.dependents_of(&changed) {
                if edge.kind != DependencyKind::Production
                    || invalid_versions.contains(&edge.dependent)
                {
                    continue;
                }
                let dependent = edge.dependent.as_str();
                let Some(candidate) = self.evaluate(dependent, state) else {
                    continue;
                };

                let raised = state
                    .inferred
                    .get(dependent)
                    .is_none_or(|existing| candidate.bump_type > existing.bump_type);
                if raised {
                    debug!(
                        package = dependent,
                        bump = %candidate.bump_type,
                        reason = candidate.description.as_deref().unwrap_or_default(),
                        "inferred change record"
                    );
                    state.inferred.insert(dependent.to_string(), candidate);
                }

                let explicit_max = state
                    .explicit
                    .get(dependent)
                    .and_then(|records| records.iter().map(|r| r.bump_type).max());
                let inferred_max = state.inferred.get(dependent).map(|r| r.bump_type);
                let Some(target) = explicit_max.max(inferred_max) else {
                    continue;
                };

                if state.bumps.get(dependent) != Some(&target) {
                    state.bumps.insert(dependent.to_string(), target);
                    worklist.insert(dependent.to_string());
                }
            }
        }
    }

    /// The inferred record `dependent` needs given the current bumps, if any of
    /// its production ranges is broken.
    fn evaluate(&self, dependent: &str, state: &ResolverState) -> Option<ChangeRecord> {
        let has_explicit = state.explicit.contains_key(dependent);
        let mut required: Option<(BumpType, String)> = None;

        for edge in self.graph.dependencies_of(dependent) {
            if edge.kind != DependencyKind::Production {
                continue;
            }
            let dependency = edge.dependency.as_str();
            let (Some(bump), Some(current)) =
                (state.bumps.get(dependency), state.versions.get(dependency))
            else {
                continue;
            };
            let Some(range) = state
                .ranges
                .get(&(dependent.to_string(), dependency.to_string()))
            else {
                continue;
            };

            // A range already unsatisfied by the current version is stale, not broken.
            let next = bump_version(current, *bump);
            if !range.matches(current) || !range.is_violated_by(&next) {
                continue;
            }

            let kind = self.policy.required_bump(has_explicit, *bump);
            if required.as_ref().is_none_or(|(existing, _)| kind > *existing) {
                let declared = self
                    .graph
                    .package(dependent)
                    .and_then(|p| p.declared_range(dependency, DependencyKind::Production))
                    .unwrap_or_default();
                let reason = format!("{dependency} {next} is outside declared range {declared}");
                required = Some((kind, reason));
            }
        }

        required.map(|(kind, reason)| ChangeRecord::inferred(dependent, kind).with_description(reason))
    }

    fn upstream_activity(
        &self,
        bumps: &BTreeMap<String, BumpType>,
    ) -> BTreeMap<String, BTreeSet<DependencyKind>> {
        let mut activity: BTreeMap<String, BTreeSet<DependencyKind>> = BTreeMap::new();

        for edge in self.graph.edges() {
            if edge.dependent != edge.dependency && bumps.contains_key(&edge.dependency) {
                activity
                    .entry(edge.dependent.clone())
                    .or_default()
                    .insert(edge.kind);
            }
        }

        activity
    }
}
