//! Evaluation order for formula cells.
//!
//! Kahn's algorithm over the dependency graph. The ready queue is FIFO,
//! seeded in scan order, and dependents are released in the order the graph
//! lists them (also scan order), so the same sheet always yields the same
//! order.

use std::collections::{HashMap, VecDeque};

use super::CellRef;
use super::cycle::first_cycle;
use super::deps::DependencyGraph;
use crate::error::{EngineError, Result};

/// Order every formula cell so that precedents come before dependents.
///
/// Fails with [`EngineError::CircularDependency`] listing every cell that
/// could not be placed, plus one concrete loop among them.
pub fn schedule(graph: &DependencyGraph) -> Result<Vec<CellRef>> {
    let mut in_degree: HashMap<CellRef, usize> =
        graph.nodes().map(|at| (at, graph.in_degree(&at))).collect();

    let mut queue: VecDeque<CellRef> = graph
        .nodes()
        .filter(|at| in_degree[at] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(cell) = queue.pop_front() {
        order.push(cell);

        for dep in graph.dependents(&cell) {
            if let Some(deg) = in_degree.get_mut(dep) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(*dep);
                }
            }
        }
    }

    if order.len() < graph.len() {
        let cells: Vec<CellRef> = graph
            .nodes()
            .filter(|at| in_degree[at] > 0)
            .collect();
        let cycle = first_cycle(&cells, graph).unwrap_or_default();
        tracing::debug!(unscheduled = cells.len(), "dependency cycle");
        return Err(EngineError::CircularDependency { cells, cycle });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cell::RawCell;
    use crate::engine::classify::classify;
    use proptest::prelude::*;

    fn at(s: &str) -> CellRef {
        CellRef::parse(s).unwrap()
    }

    fn graph(cells: &[(&str, &str)]) -> DependencyGraph {
        let raw = cells
            .iter()
            .map(|(c, input)| RawCell::from_input(at(c), input))
            .collect::<Vec<_>>();
        DependencyGraph::build(&classify(raw, None))
    }

    fn order(cells: &[(&str, &str)]) -> Vec<String> {
        schedule(&graph(cells))
            .unwrap()
            .into_iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(order(&[("A1", "1")]), Vec::<String>::new());
    }

    #[test]
    fn test_chain_declared_backwards() {
        assert_eq!(
            order(&[("A1", "=A2+1"), ("A2", "=A3+1"), ("A3", "=1")]),
            vec!["A3", "A2", "A1"]
        );
    }

    #[test]
    fn test_independent_formulas_keep_scan_order() {
        assert_eq!(
            order(&[("C1", "=1"), ("A1", "=2"), ("B1", "=3")]),
            vec!["C1", "A1", "B1"]
        );
    }

    #[test]
    fn test_ready_ties_break_by_scan_order() {
        // B1 and C1 both become ready only after A2; A3 is ready from the start.
        assert_eq!(
            order(&[
                ("A1", "=C1+B1"),
                ("B1", "=A2"),
                ("C1", "=A2"),
                ("A2", "=1"),
                ("A3", "=2"),
            ]),
            vec!["A2", "A3", "B1", "C1", "A1"]
        );
    }

    #[test]
    fn test_sheet1_scenario() {
        assert_eq!(
            order(&[("A1", "2"), ("A2", "3"), ("A3", "=A1+A2"), ("A4", "=A3*2")]),
            vec!["A3", "A4"]
        );
    }

    #[test]
    fn test_two_cell_cycle() {
        let err = schedule(&graph(&[("A1", "=B1"), ("B1", "=A1")])).unwrap_err();
        match err {
            EngineError::CircularDependency { cells, cycle } => {
                assert_eq!(cells, vec![at("A1"), at("B1")]);
                assert_eq!(cycle, vec![at("A1"), at("B1"), at("A1")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_fails() {
        let err = schedule(&graph(&[("A1", "=1"), ("B1", "=B1+A1")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Circular dependency detected: B1 -> B1"
        );
    }

    #[test]
    fn test_downstream_of_cycle_is_unscheduled() {
        let err = schedule(&graph(&[
            ("A1", "=B1"),
            ("B1", "=A1"),
            ("C1", "=A1"),
            ("D1", "=5"),
        ]))
        .unwrap_err();
        match err {
            EngineError::CircularDependency { cells, .. } => {
                assert_eq!(cells, vec![at("A1"), at("B1"), at("C1")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_long_cycle_is_an_error_not_a_crash() {
        let n = 100_000;
        let sheet: Vec<(String, String)> = (1..=n)
            .map(|i| {
                let prev = if i == 1 { n } else { i - 1 };
                (format!("B{i}"), format!("=B{prev}+1"))
            })
            .collect();
        let cells: Vec<(&str, &str)> =
            sheet.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        match schedule(&graph(&cells)).unwrap_err() {
            EngineError::CircularDependency { cells, cycle } => {
                assert_eq!(cells.len(), n);
                assert_eq!(cycle.len(), n + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Random acyclic sheets: formula `i` may only reference formulas `< i`,
    /// but cells are declared in a shuffled order.
    fn acyclic_sheet() -> impl Strategy<Value = Vec<(String, String)>> {
        (1usize..12)
            .prop_flat_map(|n| {
                let deps = proptest::collection::vec(proptest::collection::vec(0usize..n, 0..4), n);
                (Just(n), deps, Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            })
            .prop_map(|(n, deps, perm)| {
                (0..n)
                    .map(|i| {
                        let refs: Vec<String> = deps[i]
                            .iter()
                            .filter(|&&d| d < i)
                            .map(|&d| format!("A{}", perm[d] + 1))
                            .collect();
                        let body = if refs.is_empty() {
                            "1".to_string()
                        } else {
                            refs.join("+")
                        };
                        (format!("A{}", perm[i] + 1), format!("={body}"))
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_order_respects_every_edge(sheet in acyclic_sheet()) {
            let cells: Vec<(&str, &str)> =
                sheet.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
            let g = graph(&cells);
            let order = schedule(&g).unwrap();

            prop_assert_eq!(order.len(), sheet.len());
            let pos: HashMap<CellRef, usize> =
                order.iter().enumerate().map(|(i, c)| (*c, i)).collect();
            prop_assert_eq!(pos.len(), order.len());
            for node in g.nodes() {
                for dep in g.precedents(&node) {
                    prop_assert!(pos[dep] < pos[&node]);
                }
            }
            // Reproducible.
            prop_assert_eq!(schedule(&g).unwrap(), order);
        }

        #[test]
        fn prop_any_cycle_fails(len in 1usize..8) {
            // A1 -> A2 -> ... -> An -> A1
            let sheet: Vec<(String, String)> = (1..=len)
                .map(|i| (format!("A{i}"), format!("=A{}+1", i % len + 1)))
                .collect();
            let cells: Vec<(&str, &str)> =
                sheet.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
            let is_cycle = matches!(
                schedule(&graph(&cells)),
                Err(EngineError::CircularDependency { .. })
            );
            prop_assert!(is_cycle);
        }
    }
}
