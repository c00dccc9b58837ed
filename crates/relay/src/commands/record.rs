use std::path::PathBuf;

use clap::Args;
use relay_state::PublishState;
use tracing::info;

use super::{SnapshotArgs, check_errors, emit, log_plan};
use crate::config::RelayConfig;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct RecordArgs {
    #[command(flatten)]
    input: SnapshotArgs,

    /// Publish state file to update; created when missing
    #[arg(long)]
    state: PathBuf,
}

pub(crate) fn run(args: &RecordArgs, config: &RelayConfig) -> Result<()> {
    let snapshot = args.input.load_snapshot()?;
    let policy = args.input.policy(config);
    let mut state = PublishState::load(&args.state)?;

    let plan = relay_plan::plan(&snapshot, &policy)?;
    log_plan(&plan);
    check_errors(&plan, args.input.strict)?;

    let pending = state.pending(&plan);
    if pending.is_empty() {
        return emit("Nothing to record.\n");
    }

    let mut report = String::new();
    for change in &pending {
        state.record(change.name.clone(), change.to_version.clone());
        report.push_str(&format!("recorded {} {}\n", change.name, change.to_version));
    }

    state.save(&args.state).map_err(CliError::StateSave)?;
    info!(
        recorded = pending.len(),
        path = %args.state.display(),
        "updated publish state"
    );

    emit(&report)
}
