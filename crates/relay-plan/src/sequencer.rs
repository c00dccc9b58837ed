use std::collections::{BTreeMap, BTreeSet};

use relay_core::DependencyKind;
use tracing::warn;

use crate::calculator::VersionChange;
use crate::graph::{DependencyGraph, find_cycles};
use crate::issue::{PlanIssue, Staged};

/// Orders changed packages so every production dependency publishes first.
pub struct PublishSequencer<'a> {
    graph: &'a DependencyGraph,
}

impl<'a> PublishSequencer<'a> {
    #[must_use]
    pub fn new(graph: &'a DependencyGraph) -> Self {
        Self { graph }
    }

    /// Kahn's algorithm over production edges between changed packages, taking
    /// the lexically smallest ready package at each step.
    ///
    /// Packages left over are either on a cycle or behind one; all of them are
    /// left out of the order and reported in one `CyclicDependency` issue.
    #[must_use]
    pub fn sequence(&self, changes: &[VersionChange]) -> Staged<Vec<String>> {
        let changed: BTreeSet<&str> = changes.iter().map(|c| c.name.as_str()).collect();

        let mut in_degree: BTreeMap<&str, usize> = changed.iter().map(|name| (*name, 0)).collect();
        for edge in self.production_edges(&changed) {
            if let Some(degree) = in_degree.get_mut(edge.1) {
                *degree += 1;
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(changed.len());

        while let Some(next) = ready.pop_first() {
            order.push(next.to_string());
            for edge in self.graph.dependents_of(next) {
                if edge.kind != DependencyKind::Production {
                    continue;
                }
                if let Some(degree) = in_degree.get_mut(edge.dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(edge.dependent.as_str());
                    }
                }
            }
        }

        let remaining: BTreeSet<&str> = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(name, _)| name)
            .collect();
        if remaining.is_empty() {
            return Staged::new(order, Vec::new());
        }

        // Cycles among changed packages only pass through the graph's cyclic set.
        let candidates: BTreeSet<&str> = remaining
            .iter()
            .copied()
            .filter(|name| self.graph.cyclic_packages().contains(*name))
            .collect();
        let members: BTreeSet<String> = find_cycles(
            candidates.iter().copied(),
            self.production_edges(&candidates),
        )
        .into_iter()
        .flatten()
        .collect();
        let blocked: Vec<String> = remaining
            .iter()
            .filter(|name| !members.contains(**name))
            .map(|name| (*name).to_string())
            .collect();
        let members: Vec<String> = members.into_iter().collect();

        warn!(
            members = %members.join(", "),
            blocked = %blocked.join(", "),
            "changed packages form a dependency cycle"
        );

        Staged::new(
            order,
            vec![PlanIssue::CyclicDependency { members, blocked }],
        )
    }

    /// `(dependency, dependent)` pairs of production edges inside `within`.
    fn production_edges<'s>(
        &'s self,
        within: &'s BTreeSet<&'s str>,
    ) -> impl Iterator<Item = (&'s str, &'s str)> {
        self.graph
            .edges()
            .filter(move |edge| {
                edge.kind == DependencyKind::Production
                    && within.contains(edge.dependency.as_str())
                    && within.contains(edge.dependent.as_str())
            })
            .map(|edge| (edge.dependency.as_str(), edge.dependent.as_str()))
    }
}
