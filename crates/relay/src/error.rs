use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load snapshot")]
    Snapshot(#[from] relay_snapshot::SnapshotError),

    #[error("failed to plan publishing")]
    Plan(#[from] relay_plan::PlanError),

    #[error("failed to load publish state")]
    State(#[from] relay_state::StateError),

    #[error("failed to save publish state")]
    StateSave(#[source] relay_state::StateError),

    #[error("failed to render report")]
    Report(#[from] relay_report::ReportError),

    #[error("failed to write report")]
    Io(#[from] std::io::Error),

    #[error("plan has {count} error(s) and --strict is set")]
    StrictErrors { count: usize },
}

pub type Result<T> = std::result::Result<T, CliError>;
