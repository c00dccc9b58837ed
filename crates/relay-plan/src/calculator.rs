use relay_core::{BumpType, ChangeRecord};
use relay_version::{bump_version, max_bump_type};
use semver::Version;
use serde::Serialize;

use crate::resolver::Resolution;

/// Planned version change for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    pub name: String,
    pub from_version: Version,
    pub to_version: Version,
    pub bump_type: BumpType,
    /// At least one explicit record exists.
    pub has_changesets: bool,
    /// No explicit record exists and one was inferred.
    pub will_generate_changeset: bool,
    /// The inferred requirement exceeds every explicit record.
    pub needs_bump_escalation: bool,
}

/// Folds effective change records into one version change per package.
pub struct BumpCalculator;

impl BumpCalculator {
    /// Version changes in ascending package name order.
    #[must_use]
    pub fn calculate(resolution: &Resolution) -> Vec<VersionChange> {
        resolution
            .records
            .iter()
            .filter_map(|(name, records)| {
                let current = resolution.current_versions.get(name)?;
                Self::version_change(name, current, records)
            })
            .collect()
    }

    #[must_use]
    pub fn version_change(
        name: &str,
        current: &Version,
        records: &[ChangeRecord],
    ) -> Option<VersionChange> {
        let (explicit, inferred): (Vec<_>, Vec<_>) = records
            .iter()
            .partition(|record| record.is_explicit());
        let explicit_bumps: Vec<_> = explicit.iter().map(|r| r.bump_type).collect();
        let inferred_bumps: Vec<_> = inferred.iter().map(|r| r.bump_type).collect();

        let explicit_max = max_bump_type(&explicit_bumps);
        let inferred_max = max_bump_type(&inferred_bumps);
        let bump_type = explicit_max.max(inferred_max)?;

        let has_changesets = explicit_max.is_some();
        let needs_bump_escalation = match (explicit_max, inferred_max) {
            (Some(explicit), Some(inferred)) => inferred > explicit,
            _ => false,
        };

        Some(VersionChange {
            name: name.to_string(),
            from_version: current.clone(),
            to_version: bump_version(current, bump_type),
            bump_type,
            has_changesets,
            will_generate_changeset: !has_changesets && inferred_max.is_some(),
            needs_bump_escalation,
        })
    }
}
