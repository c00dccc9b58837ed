use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::Args;
use relay_core::BumpType;
use relay_plan::{EscalationPolicy, PlanPolicy};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "relay.toml";

/// Contents of `relay.toml`.
/// Format:
/// ```toml
/// [policy]
/// cascade-through-peer = true
/// escalation = "match-dependency"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RelayConfig {
    #[serde(default)]
    pub(crate) policy: PlanPolicy,
}

impl RelayConfig {
    /// An explicit path must exist; the default `relay.toml` is optional.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                debug!("no {DEFAULT_CONFIG_FILE} found, using default policy");
                return Ok(Self::default());
            }
            Err(source) => return Err(CliError::ConfigRead { path, source }),
        };

        let config: Self =
            toml::from_str(&content).map_err(|source| CliError::ConfigParse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), policy = ?config.policy, "loaded config");
        Ok(config)
    }
}

/// Command-line overrides for the file policy.
#[derive(Args, Debug, Default)]
pub(crate) struct PolicyArgs {
    /// Follow peer-dependency edges when tracing breaking cascades
    #[arg(long)]
    cascade_peer: bool,

    /// Follow dev-dependency edges when tracing breaking cascades
    #[arg(long)]
    cascade_dev: bool,

    /// Bump for a package with its own changes whose dependency range breaks
    #[arg(long, value_enum)]
    escalation: Option<EscalationPolicy>,

    /// Bump generated for a package that only needs republishing
    #[arg(long, value_enum)]
    inferred_bump: Option<BumpType>,
}

impl PolicyArgs {
    pub(crate) fn apply(&self, mut policy: PlanPolicy) -> PlanPolicy {
        if self.cascade_peer {
            policy = policy.with_peer_cascade(true);
        }
        if self.cascade_dev {
            policy = policy.with_dev_cascade(true);
        }
        if let Some(escalation) = self.escalation {
            policy = policy.with_escalation(escalation);
        }
        if let Some(bump) = self.inferred_bump {
            policy = policy.with_inferred_bump(bump);
        }
        policy
    }
}
