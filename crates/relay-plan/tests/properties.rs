//! Property-based tests for plan invariants.
//!
//! - Topological validity: production dependencies publish before dependents
//! - Determinism: identical snapshots produce identical plans
//! - Info completeness: every package is changed or informational, never both
//! - Bump monotonicity: computed bumps never fall below explicit records
//! - Cascades are irreflexive and closed under production dependents

use std::collections::BTreeMap;

use proptest::prelude::*;
use relay_core::{BumpType, DependencyKind, Package, PackageSnapshot};
use relay_plan::{DependencyGraph, PlanPolicy, plan};

fn bump_strategy() -> impl Strategy<Value = BumpType> {
    prop_oneof![
        Just(BumpType::Patch),
        Just(BumpType::Minor),
        Just(BumpType::Major),
    ]
}

fn kind_strategy() -> impl Strategy<Value = DependencyKind> {
    prop_oneof![
        3 => Just(DependencyKind::Production),
        1 => Just(DependencyKind::Development),
        1 => Just(DependencyKind::Peer),
    ]
}

fn range_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["^1.0.0", "~1.0.0", "1.0.0", "*", ">=1.0.0", "^1.0.0 || ^2.0.0"])
}

/// Packages `pkg0..pkgN` at 1.0.0 with random edges, which may form cycles.
fn snapshot_strategy() -> impl Strategy<Value = PackageSnapshot> {
    (2usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::option::of(bump_strategy()), n),
                prop::collection::vec(
                    (0..n, 0..n, kind_strategy(), range_strategy()),
                    0..n * 2,
                ),
            )
        })
        .prop_map(|(bumps, edges)| {
            let mut packages: Vec<Package> = bumps
                .iter()
                .enumerate()
                .map(|(i, bump)| {
                    let package = Package::new(format!("pkg{i}"), "1.0.0");
                    match bump {
                        Some(bump) => package.with_change(*bump),
                        None => package,
                    }
                })
                .collect();
            for (dependent, dependency, kind, range) in edges {
                if dependent != dependency {
                    let name = format!("pkg{dependency}");
                    let package = packages[dependent].clone();
                    packages[dependent] = package.with_dependency(kind, name, range);
                }
            }
            PackageSnapshot::new(packages)
        })
}

proptest! {
    #[test]
    fn publishing_order_respects_production_edges(snapshot in snapshot_strategy()) {
        let plan = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");
        let graph = DependencyGraph::build(&snapshot.resolved).expect("build graph");
        let index: BTreeMap<&str, usize> = plan
            .publishing_order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        for edge in graph.edges().filter(|e| e.kind == DependencyKind::Production) {
            if let (Some(dep), Some(dependent)) = (
                index.get(edge.dependency.as_str()),
                index.get(edge.dependent.as_str()),
            ) {
                prop_assert!(dep < dependent, "{} must precede {}", edge.dependency, edge.dependent);
            }
        }
    }

    #[test]
    fn planning_is_deterministic(snapshot in snapshot_strategy()) {
        let first = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");
        let second = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serialize plan"),
            serde_json::to_string(&second).expect("serialize plan")
        );
    }

    #[test]
    fn every_package_is_changed_xor_informational(snapshot in snapshot_strategy()) {
        let plan = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");

        for package in &snapshot.resolved {
            let changed = plan.version_change(&package.name).is_some();
            let informational = plan.info_reason(&package.name).is_some();
            prop_assert!(changed ^ informational, "package {}", package.name);
        }
    }

    #[test]
    fn bumps_never_fall_below_explicit_records(snapshot in snapshot_strategy()) {
        let plan = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");

        for package in &snapshot.resolved {
            let Some(explicit) = package.changes.iter().map(|r| r.bump_type).max() else {
                continue;
            };
            let change = plan.version_change(&package.name).expect("explicit record yields a change");
            prop_assert!(change.bump_type >= explicit);
            prop_assert!(change.has_changesets);
            prop_assert!(!change.will_generate_changeset);
            prop_assert_eq!(change.needs_bump_escalation, change.bump_type > explicit);
        }
    }

    #[test]
    fn cascades_are_irreflexive_and_closed(snapshot in snapshot_strategy()) {
        let plan = plan(&snapshot, &PlanPolicy::default()).expect("plan snapshot");
        let graph = DependencyGraph::build(&snapshot.resolved).expect("build graph");

        for (source, affected) in &plan.breaking_cascades {
            prop_assert!(!affected.contains(source));
            prop_assert_eq!(
                plan.version_change(source).map(|c| c.bump_type),
                Some(BumpType::Major)
            );
            for member in affected {
                for edge in graph.dependents_of(member) {
                    if edge.kind == DependencyKind::Production && &edge.dependent != source {
                        prop_assert!(affected.contains(&edge.dependent));
                    }
                }
            }
        }
    }
}
