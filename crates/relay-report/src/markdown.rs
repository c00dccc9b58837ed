use relay_core::{ChangeRecord, DependencyKind, Package};
use relay_plan::{DependencyGraph, Plan, VersionChange};
use relay_state::PublishState;

use crate::error::Result;
use crate::formatter::{AnalyzeFormatter, PreviewFormatter};
use crate::sections::{
    EMPTY, change_notes, format_breaking_cascades, format_errors, format_unchanged,
    format_version_changes, push_section,
};

pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn format_packages(output: &mut String, graph: &DependencyGraph) {
        if graph.is_empty() {
            output.push_str(EMPTY);
            return;
        }

        output.push_str("| Package | Version | Records |\n");
        output.push_str("|---|---|---|\n");
        for package in graph.packages() {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                package.name,
                package.version,
                Self::format_records(package)
            ));
        }
    }

    fn format_records(package: &Package) -> String {
        if package.changes.is_empty() {
            return "-".to_string();
        }

        let records: Vec<String> = package
            .changes
            .iter()
            .map(|record| Self::format_record(package, record))
            .collect();
        records.join(", ")
    }

    fn format_record(package: &Package, record: &ChangeRecord) -> String {
        if record.target.is_empty() || record.target == package.name {
            record.bump_type.to_string()
        } else {
            format!("{} → {}", record.bump_type, record.target)
        }
    }

    fn format_dependencies(output: &mut String, graph: &DependencyGraph) {
        let mut any = false;
        for package in graph.packages() {
            let edges: Vec<_> = graph.dependencies_of(&package.name).collect();
            if edges.is_empty() {
                continue;
            }
            any = true;

            output.push_str(&format!("- {}\n", package.name));
            for kind in DependencyKind::ALL {
                for edge in edges.iter().filter(|edge| edge.kind == kind) {
                    let range = package.declared_range(&edge.dependency, kind).unwrap_or("*");
                    output.push_str(&format!("  - {kind}: {} `{range}`\n", edge.dependency));
                }
            }
        }

        if !any {
            output.push_str(EMPTY);
        }
    }

    /// Decided bumps only; next versions are left to the preview.
    fn format_pending_changes(output: &mut String, plan: &Plan) {
        if plan.version_changes.is_empty() {
            output.push_str(EMPTY);
            return;
        }

        output.push_str("| Package | Current | Bump | Notes |\n");
        output.push_str("|---|---|---|---|\n");
        for change in &plan.version_changes {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                change.name,
                change.from_version,
                change.bump_type,
                change_notes(change).join(", ")
            ));
        }
    }

    fn format_publish_order(output: &mut String, plan: &Plan, state: Option<&PublishState>) {
        if plan.publishing_order.is_empty() {
            output.push_str("_Nothing to publish._\n");
            return;
        }

        let pending = state.map(|state| state.pending(plan));
        for (position, change) in plan.ordered_changes().enumerate() {
            let published = pending
                .as_ref()
                .is_some_and(|pending| !pending.iter().any(|p| p.name == change.name));
            output.push_str(&format!(
                "{}. {} {} → {} ({}){}\n",
                position + 1,
                change.name,
                change.from_version,
                change.to_version,
                change.bump_type,
                Self::format_flags(change, published)
            ));
        }

        if let Some(pending) = pending {
            output.push_str(&format!(
                "\n{} of {} still to publish.\n",
                pending.len(),
                plan.publishing_order.len()
            ));
        }
    }

    fn format_flags(change: &VersionChange, published: bool) -> String {
        let mut flags = Vec::new();
        if change.will_generate_changeset {
            flags.push("generated changeset");
        }
        if change.needs_bump_escalation {
            flags.push("escalated");
        }
        if published {
            flags.push("already published");
        }

        if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        }
    }
}

impl AnalyzeFormatter for MarkdownFormatter {
    fn format_analysis(&self, graph: &DependencyGraph, plan: &Plan) -> Result<String> {
        let mut output = String::from("# Publish analysis\n");

        push_section(&mut output, "Packages");
        Self::format_packages(&mut output, graph);
        push_section(&mut output, "Dependencies");
        Self::format_dependencies(&mut output, graph);
        push_section(&mut output, "Pending changes");
        Self::format_pending_changes(&mut output, plan);
        push_section(&mut output, "Breaking cascades");
        format_breaking_cascades(&mut output, plan);
        push_section(&mut output, "Unchanged");
        format_unchanged(&mut output, plan);
        format_errors(&mut output, plan);

        Ok(output)
    }
}

impl PreviewFormatter for MarkdownFormatter {
    fn format_preview(&self, plan: &Plan, state: Option<&PublishState>) -> Result<String> {
        let mut output = String::from("# Publish preview\n");

        push_section(&mut output, "Publish order");
        Self::format_publish_order(&mut output, plan, state);
        push_section(&mut output, "Version changes");
        format_version_changes(&mut output, plan);
        push_section(&mut output, "Breaking cascades");
        format_breaking_cascades(&mut output, plan);
        push_section(&mut output, "Unchanged");
        format_unchanged(&mut output, plan);
        format_errors(&mut output, plan);

        Ok(output)
    }
}
