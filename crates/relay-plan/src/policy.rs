use clap::ValueEnum;
use relay_core::{BumpType, DependencyKind};
use serde::{Deserialize, Serialize};

/// How far a package that already carries explicit records is raised when a
/// dependency's new version breaks its declared range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationPolicy {
    /// Raise to at least `minor`.
    #[default]
    Minor,
    /// Raise to the breaking dependency's own bump kind.
    MatchDependency,
}

/// Explicit policy context threaded through every planning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PlanPolicy {
    /// Whether breaking cascades follow peer-dependency edges.
    pub cascade_through_peer: bool,
    /// Whether breaking cascades follow development-dependency edges.
    pub cascade_through_dev: bool,
    pub escalation: EscalationPolicy,
    /// Bump kind of the record generated for a package with no explicit records.
    pub inferred_bump: BumpType,
}

impl Default for PlanPolicy {
    fn default() -> Self {
        Self {
            cascade_through_peer: false,
            cascade_through_dev: false,
            escalation: EscalationPolicy::default(),
            inferred_bump: BumpType::Patch,
        }
    }
}

impl PlanPolicy {
    #[must_use]
    pub fn cascades_through(&self, kind: DependencyKind) -> bool {
        match kind {
            DependencyKind::Production => true,
            DependencyKind::Development => self.cascade_through_dev,
            DependencyKind::Peer => self.cascade_through_peer,
        }
    }

    /// Bump required of a package whose range on a dependency bumped by
    /// `dependency_bump` is no longer satisfied.
    #[must_use]
    pub fn required_bump(&self, has_explicit: bool, dependency_bump: BumpType) -> BumpType {
        if !has_explicit {
            return self.inferred_bump;
        }
        match self.escalation {
            EscalationPolicy::Minor => BumpType::Minor,
            EscalationPolicy::MatchDependency => dependency_bump,
        }
    }

    #[must_use]
    pub fn with_peer_cascade(mut self, enabled: bool) -> Self {
        self.cascade_through_peer = enabled;
        self
    }

    #[must_use]
    pub fn with_dev_cascade(mut self, enabled: bool) -> Self {
        self.cascade_through_dev = enabled;
        self
    }

    #[must_use]
    pub fn with_escalation(mut self, escalation: EscalationPolicy) -> Self {
        self.escalation = escalation;
        self
    }

    #[must_use]
    pub fn with_inferred_bump(mut self, bump: BumpType) -> Self {
        self.inferred_bump = bump;
        self
    }
}
