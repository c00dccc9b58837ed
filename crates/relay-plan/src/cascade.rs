use std::collections::{BTreeMap, BTreeSet, VecDeque};

use relay_core::BumpType;

use crate::calculator::VersionChange;
use crate::graph::DependencyGraph;
use crate::policy::PlanPolicy;

/// Transitive dependents affected by each breaking (major) version change.
pub struct CascadeAnalyzer<'a> {
    graph: &'a DependencyGraph,
    policy: &'a PlanPolicy,
}

impl<'a> CascadeAnalyzer<'a> {
    #[must_use]
    pub fn new(graph: &'a DependencyGraph, policy: &'a PlanPolicy) -> Self {
        Self { graph, policy }
    }

    #[must_use]
    pub fn analyze(&self, changes: &[VersionChange]) -> BTreeMap<String, BTreeSet<String>> {
        changes
            .iter()
            .filter(|change| change.bump_type == BumpType::Major)
            .map(|change| (change.name.clone(), self.affected_dependents(&change.name)))
            .collect()
    }

    /// Reverse breadth-first closure from `source`'s direct dependents,
    /// excluding `source` itself.
    #[must_use]
    pub fn affected_dependents(&self, source: &str) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([source.to_string()]);

        while let Some(current) = queue.pop_front() {
            for edge in self.graph.dependents_of(&current) {
                if !self.policy.cascades_through(edge.kind) || edge.dependent == source {
                    continue;
                }
                if visited.insert(edge.dependent.clone()) {
                    queue.push_back(edge.dependent.clone());
                }
            }
        }

        visited
    }
}
