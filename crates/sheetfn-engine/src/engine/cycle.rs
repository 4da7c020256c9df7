//! Circular dependency path finding.
//!
//! The scheduler only knows which cells it could not place. To report
//! something a user can act on, this module walks precedent edges with a
//! depth-first search and returns one concrete loop, e.g. `A1 → B1 → A1`.

use std::collections::HashSet;

use super::CellRef;
use super::deps::DependencyGraph;

/// Find a cycle reachable from `start` by following precedent edges.
/// Returns the path with its first cell repeated at the end.
///
/// The walk keeps its own stack, so long chains cannot exhaust the thread's.
pub fn find_cycle(start: &CellRef, graph: &DependencyGraph) -> Option<Vec<CellRef>> {
    let mut on_path: HashSet<CellRef> = HashSet::new();
    let mut done: HashSet<CellRef> = HashSet::new();
    // (cell on the current path, index of its next precedent to visit)
    let mut stack: Vec<(CellRef, usize)> = vec![(*start, 0)];
    on_path.insert(*start);

    while let Some(frame) = stack.last_mut() {
        let (cell, next) = *frame;
        let Some(&dep) = graph.precedents(&cell).get(next) else {
            stack.pop();
            on_path.remove(&cell);
            done.insert(cell);
            continue;
        };
        frame.1 += 1;

        if on_path.contains(&dep) {
            // Drop the lead-in so the path starts where the loop does.
            let pos = stack.iter().position(|(c, _)| *c == dep)?;
            let mut path: Vec<CellRef> = stack[pos..].iter().map(|(c, _)| *c).collect();
            path.push(dep);
            return Some(path);
        }
        if !done.contains(&dep) {
            on_path.insert(dep);
            stack.push((dep, 0));
        }
    }

    None
}

/// Find the first cycle among `candidates`, trying them in order.
pub fn first_cycle(candidates: &[CellRef], graph: &DependencyGraph) -> Option<Vec<CellRef>> {
    candidates.iter().find_map(|c| find_cycle(c, graph))
}
