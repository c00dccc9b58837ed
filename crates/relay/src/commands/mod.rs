mod analyze;
mod preview;
mod record;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use relay_core::PackageSnapshot;
use relay_plan::{Plan, PlanPolicy};
use relay_report::{AnalyzeFormatter, JsonFormatter, MarkdownFormatter, PreviewFormatter};
use relay_snapshot::{default_concurrency, load_snapshot};
use tracing::{info, warn};

use crate::config::{PolicyArgs, RelayConfig};
use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the dependency graph and the plan computed from it
    Analyze(analyze::AnalyzeArgs),
    /// Show what would be published, in order
    Preview(preview::PreviewArgs),
    /// Mark every planned version as published in a state file
    Record(record::RecordArgs),
}

impl Commands {
    pub(crate) fn execute(self, config: &RelayConfig) -> Result<()> {
        match self {
            Self::Analyze(args) => analyze::run(&args, config),
            Self::Preview(args) => preview::run(&args, config),
            Self::Record(args) => record::run(&args, config),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    fn analyze_formatter(self) -> &'static dyn AnalyzeFormatter {
        match self {
            Self::Markdown => &MarkdownFormatter,
            Self::Json => &JsonFormatter,
        }
    }

    fn preview_formatter(self) -> &'static dyn PreviewFormatter {
        match self {
            Self::Markdown => &MarkdownFormatter,
            Self::Json => &JsonFormatter,
        }
    }
}

/// Snapshot input and policy overrides shared by every command.
#[derive(Args)]
pub(crate) struct SnapshotArgs {
    /// Snapshot file (.json or .toml)
    snapshot: PathBuf,

    /// Maximum number of repository records read at once
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Exit with an error when the plan reports errors
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    policy: PolicyArgs,
}

/// Arguments shared by the reporting commands.
#[derive(Args)]
pub(crate) struct PlanArgs {
    #[command(flatten)]
    input: SnapshotArgs,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

impl SnapshotArgs {
    fn load_snapshot(&self) -> Result<PackageSnapshot> {
        let jobs = self.jobs.unwrap_or_else(default_concurrency);
        Ok(load_snapshot(&self.snapshot, jobs)?)
    }

    fn policy(&self, config: &RelayConfig) -> PlanPolicy {
        self.policy.apply(config.policy)
    }
}

fn emit(report: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn check_errors(plan: &Plan, strict: bool) -> Result<()> {
    if !plan.has_errors() {
        return Ok(());
    }

    let count = plan.errors.len();
    for issue in &plan.errors {
        warn!(kind = issue.kind(), "{issue}");
    }
    if strict {
        return Err(CliError::StrictErrors { count });
    }
    eprintln!("warning: plan reported {count} error(s)");
    Ok(())
}

fn log_plan(plan: &Plan) {
    info!(
        changes = plan.version_changes.len(),
        ordered = plan.publishing_order.len(),
        errors = plan.errors.len(),
        "planned"
    );
}
