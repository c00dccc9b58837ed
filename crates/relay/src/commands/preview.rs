use std::path::PathBuf;

use clap::Args;
use relay_state::PublishState;

use super::{PlanArgs, check_errors, emit, log_plan};
use crate::config::RelayConfig;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Publish state file; versions recorded there are marked as already published
    #[arg(long)]
    state: Option<PathBuf>,
}

pub(crate) fn run(args: &PreviewArgs, config: &RelayConfig) -> Result<()> {
    let snapshot = args.plan.input.load_snapshot()?;
    let policy = args.plan.input.policy(config);
    let state = args
        .state
        .as_deref()
        .map(PublishState::load)
        .transpose()?;

    let plan = relay_plan::plan(&snapshot, &policy)?;
    log_plan(&plan);

    let report = args
        .plan
        .format
        .preview_formatter()
        .format_preview(&plan, state.as_ref())?;
    emit(&report)?;

    check_errors(&plan, args.plan.input.strict)
}
