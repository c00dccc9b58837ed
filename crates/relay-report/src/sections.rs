use relay_plan::{Plan, VersionChange};

pub(crate) const EMPTY: &str = "_None._\n";

pub(crate) fn push_section(output: &mut String, heading: &str) {
    output.push('\n');
    output.push_str(&format!("## {heading}\n\n"));
}

pub(crate) fn change_notes(change: &VersionChange) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if change.has_changesets {
        notes.push("changeset");
    }
    if change.will_generate_changeset {
        notes.push("generated changeset");
    }
    if change.needs_bump_escalation {
        notes.push("escalated");
    }
    notes
}

pub(crate) fn format_version_changes(output: &mut String, plan: &Plan) {
    if plan.version_changes.is_empty() {
        output.push_str(EMPTY);
        return;
    }

    output.push_str("| Package | From | To | Bump | Notes |\n");
    output.push_str("|---|---|---|---|---|\n");
    for change in &plan.version_changes {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            change.name,
            change.from_version,
            change.to_version,
            change.bump_type,
            change_notes(change).join(", ")
        ));
    }
}

pub(crate) fn format_breaking_cascades(output: &mut String, plan: &Plan) {
    if plan.breaking_cascades.is_empty() {
        output.push_str(EMPTY);
        return;
    }

    for (source, affected) in &plan.breaking_cascades {
        if affected.is_empty() {
            output.push_str(&format!("- {source}: no dependents affected\n"));
        } else {
            let names: Vec<&str> = affected.iter().map(String::as_str).collect();
            output.push_str(&format!("- {source}: {}\n", names.join(", ")));
        }
    }
}

pub(crate) fn format_unchanged(output: &mut String, plan: &Plan) {
    if plan.info.is_empty() {
        output.push_str(EMPTY);
        return;
    }

    for entry in &plan.info {
        output.push_str(&format!("- {}: {}\n", entry.name, entry.reason));
    }
}

/// Omitted entirely when the plan has no errors.
pub(crate) fn format_errors(output: &mut String, plan: &Plan) {
    if !plan.has_errors() {
        return;
    }

    push_section(output, "Errors");
    for issue in &plan.errors {
        output.push_str(&format!("- {}: {issue}\n", issue.kind()));
    }
}
