use relay_plan::{DependencyGraph, Plan};
use relay_state::PublishState;

use crate::error::Result;

/// Renders the graph alongside the plan computed from it.
pub trait AnalyzeFormatter {
    /// # Errors
    ///
    /// Returns an error if the output format cannot represent the plan.
    fn format_analysis(&self, graph: &DependencyGraph, plan: &Plan) -> Result<String>;
}

/// Renders what publishing the plan would do, optionally against a record of
/// versions that are already out.
pub trait PreviewFormatter {
    /// # Errors
    ///
    /// Returns an error if the output format cannot represent the plan.
    fn format_preview(&self, plan: &Plan, state: Option<&PublishState>) -> Result<String>;
}
