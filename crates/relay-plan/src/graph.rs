use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use relay_core::{DependencyKind, Package};
use serde::Serialize;
use tracing::debug;

use crate::error::PlanError;

/// `dependent` declares `dependency` in its `kind` dependency map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DependencyEdge {
    pub dependent: String,
    pub dependency: String,
    pub kind: DependencyKind,
}

/// Name-keyed dependency graph over the packages of one snapshot.
///
/// Only relationships between snapshot packages are modelled; dependencies on
/// anything else are external and omitted.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, Package>,
    edges: BTreeSet<DependencyEdge>,
    forward: BTreeMap<String, Vec<DependencyEdge>>,
    reverse: BTreeMap<String, Vec<DependencyEdge>>,
    cyclic: BTreeSet<String>,
}

impl DependencyGraph {
    /// # Errors
    ///
    /// Returns `PlanError::DuplicatePackageName` if two packages share a name.
    pub fn build(packages: &[Package]) -> Result<Self, PlanError> {
        let mut nodes = BTreeMap::new();
        for package in packages {
            if nodes.contains_key(&package.name) {
                return Err(PlanError::DuplicatePackageName {
                    name: package.name.clone(),
                });
            }
            nodes.insert(package.name.clone(), package.clone());
        }

        let mut edges = BTreeSet::new();
        for package in packages {
            for kind in DependencyKind::ALL {
                for dependency in package.dependency_map(kind).keys() {
                    if nodes.contains_key(dependency) {
                        edges.insert(DependencyEdge {
                            dependent: package.name.clone(),
                            dependency: dependency.clone(),
                            kind,
                        });
                    }
                }
            }
        }

        let mut forward: BTreeMap<String, Vec<DependencyEdge>> = BTreeMap::new();
        let mut reverse: BTreeMap<String, Vec<DependencyEdge>> = BTreeMap::new();
        for edge in &edges {
            forward
                .entry(edge.dependent.clone())
                .or_default()
                .push(edge.clone());
            reverse
                .entry(edge.dependency.clone())
                .or_default()
                .push(edge.clone());
        }

        let cyclic = find_cycles(
            nodes.keys().map(String::as_str),
            edges
                .iter()
                .filter(|e| e.kind == DependencyKind::Production)
                .map(|e| (e.dependency.as_str(), e.dependent.as_str())),
        )
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>();

        debug!(
            packages = nodes.len(),
            edges = edges.len(),
            cyclic = cyclic.len(),
            "built dependency graph"
        );

        Ok(Self {
            nodes,
            edges,
            forward,
            reverse,
            cyclic,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.nodes.get(name)
    }

    /// Packages in ascending name order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.nodes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter()
    }

    /// Edges from `name` to the packages it depends on.
    pub fn dependencies_of<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a DependencyEdge> + use<'a> {
        self.forward.get(name).into_iter().flatten()
    }

    /// Edges from packages that depend on `name`.
    pub fn dependents_of<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a DependencyEdge> + use<'a> {
        self.reverse.get(name).into_iter().flatten()
    }

    #[must_use]
    pub fn has_edge(&self, dependent: &str, dependency: &str, kind: DependencyKind) -> bool {
        self.forward
            .get(dependent)
            .is_some_and(|edges| edges.iter().any(|e| e.dependency == dependency && e.kind == kind))
    }

    /// Packages that sit on a production-dependency cycle anywhere in the
    /// snapshot, whether or not they change.
    #[must_use]
    pub fn cyclic_packages(&self) -> &BTreeSet<String> {
        &self.cyclic
    }
}

/// Strongly connected groups that form a cycle, each sorted, in ascending
/// order. Edges point from dependency to dependent; direction does not affect
/// which groups are found.
pub(crate) fn find_cycles<'a>(
    nodes: impl IntoIterator<Item = &'a str>,
    edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<BTreeSet<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in nodes {
        graph.add_node(node);
    }
    for (from, to) in edges {
        graph.add_edge(from, to, ());
    }

    let mut cycles: Vec<BTreeSet<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        })
        .map(|component| component.into_iter().map(str::to_string).collect())
        .collect();
    cycles.sort();
    cycles
}
