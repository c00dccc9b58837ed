use std::collections::{BTreeMap, BTreeSet};

use relay_core::{BumpType, Package};
use relay_plan::{DependencyEdge, DependencyGraph, InfoEntry, Plan, PlanIssue, VersionChange};
use relay_state::PublishState;
use semver::Version;
use serde::Serialize;

use crate::error::Result;
use crate::formatter::{AnalyzeFormatter, PreviewFormatter};

/// A decided bump without its next version.
#[derive(Serialize)]
struct PendingChange<'a> {
    name: &'a str,
    current_version: &'a Version,
    bump_type: BumpType,
    has_changesets: bool,
    will_generate_changeset: bool,
    needs_bump_escalation: bool,
}

impl<'a> From<&'a VersionChange> for PendingChange<'a> {
    fn from(change: &'a VersionChange) -> Self {
        Self {
            name: &change.name,
            current_version: &change.from_version,
            bump_type: change.bump_type,
            has_changesets: change.has_changesets,
            will_generate_changeset: change.will_generate_changeset,
            needs_bump_escalation: change.needs_bump_escalation,
        }
    }
}

#[derive(Serialize)]
struct AnalysisDocument<'a> {
    packages: Vec<&'a Package>,
    dependencies: Vec<&'a DependencyEdge>,
    pending_changes: Vec<PendingChange<'a>>,
    breaking_cascades: &'a BTreeMap<String, BTreeSet<String>>,
    info: &'a [InfoEntry],
    errors: &'a [PlanIssue],
}

#[derive(Serialize)]
struct PreviewDocument<'a> {
    #[serde(flatten)]
    plan: &'a Plan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    already_published: Vec<&'a str>,
    /// Present only when a publish state was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pending: Option<Vec<&'a str>>,
}

/// Pretty-printed JSON, newline terminated.
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize>(document: &T) -> Result<String> {
        let mut output = serde_json::to_string_pretty(document)?;
        output.push('\n');
        Ok(output)
    }
}

impl AnalyzeFormatter for JsonFormatter {
    fn format_analysis(&self, graph: &DependencyGraph, plan: &Plan) -> Result<String> {
        Self::render(&AnalysisDocument {
            packages: graph.packages().collect(),
            dependencies: graph.edges().collect(),
            pending_changes: plan.version_changes.iter().map(PendingChange::from).collect(),
            breaking_cascades: &plan.breaking_cascades,
            info: &plan.info,
            errors: &plan.errors,
        })
    }
}

impl PreviewFormatter for JsonFormatter {
    fn format_preview(&self, plan: &Plan, state: Option<&PublishState>) -> Result<String> {
        let pending: Option<Vec<&str>> = state.map(|state| {
            state
                .pending(plan)
                .into_iter()
                .map(|change| change.name.as_str())
                .collect()
        });
        let already_published: Vec<&str> = pending
            .as_ref()
            .map(|pending| {
                plan.ordered_changes()
                    .map(|change| change.name.as_str())
                    .filter(|name| !pending.contains(name))
                    .collect()
            })
            .unwrap_or_default();

        Self::render(&PreviewDocument {
            plan,
            already_published,
            pending,
        })
    }
}
