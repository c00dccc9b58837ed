//! Publishing-plan resolution for interdependent packages spread over many
//! repositories.
//!
//! [`plan`] is a pure function of a [`PackageSnapshot`] and a [`PlanPolicy`]:
//! it builds the dependency graph, resolves explicit and inferred change
//! records, computes version bumps, analyses breaking cascades, and orders the
//! changed packages for publishing. Only a duplicate package name aborts;
//! everything else is reported on [`Plan::errors`].

mod calculator;
mod cascade;
mod error;
mod graph;
mod issue;
mod plan;
mod policy;
mod resolver;
mod sequencer;

pub use calculator::{BumpCalculator, VersionChange};
pub use cascade::CascadeAnalyzer;
pub use error::{PlanError, Result};
pub use graph::{DependencyEdge, DependencyGraph};
pub use issue::{PlanIssue, Staged};
pub use plan::{InfoEntry, InfoReason, Plan, PlanAssembler, PlanParts};
pub use policy::{EscalationPolicy, PlanPolicy};
pub use resolver::{ChangeRecordResolver, Resolution};
pub use sequencer::PublishSequencer;

use relay_core::PackageSnapshot;
use tracing::info;

/// Computes the publishing plan for `snapshot` under `policy`.
///
/// # Errors
///
/// Returns `PlanError::DuplicatePackageName` if two resolved packages share a
/// name.
pub fn plan(snapshot: &PackageSnapshot, policy: &PlanPolicy) -> Result<Plan> {
    let graph = DependencyGraph::build(&snapshot.resolved)?;

    let resolution = ChangeRecordResolver::new(&graph, policy).resolve();
    let version_changes = BumpCalculator::calculate(&resolution.value);
    let breaking_cascades = CascadeAnalyzer::new(&graph, policy).analyze(&version_changes);
    let sequence = PublishSequencer::new(&graph).sequence(&version_changes);

    let plan = PlanAssembler::assemble(PlanParts {
        graph: &graph,
        unresolved: &snapshot.unresolved,
        resolution,
        version_changes,
        breaking_cascades,
        sequence,
    });

    info!(
        packages = graph.len(),
        changes = plan.version_changes.len(),
        ordered = plan.publishing_order.len(),
        errors = plan.errors.len(),
        "computed publish plan"
    );

    Ok(plan)
}
