use clap::Args;
use relay_plan::DependencyGraph;

use super::{PlanArgs, check_errors, emit, log_plan};
use crate::config::RelayConfig;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct AnalyzeArgs {
    #[command(flatten)]
    plan: PlanArgs,
}

pub(crate) fn run(args: &AnalyzeArgs, config: &RelayConfig) -> Result<()> {
    let snapshot = args.plan.input.load_snapshot()?;
    let policy = args.plan.input.policy(config);

    let graph = DependencyGraph::build(&snapshot.resolved)?;
    let plan = relay_plan::plan(&snapshot, &policy)?;
    log_plan(&plan);

    let report = args.plan.format.analyze_formatter().format_analysis(&graph, &plan)?;
    emit(&report)?;

    check_errors(&plan, args.plan.input.strict)
}
