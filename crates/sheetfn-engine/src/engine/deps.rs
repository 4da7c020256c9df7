//! Dependency graph over formula cells.
//!
//! # Edge Direction
//!
//! ```text
//! A → B  means  "B depends on A"  (A must be computed before B)
//! ```
//!
//! Only formula-to-formula references become edges. A reference to a value
//! cell, or to a coordinate with no cell at all, is recorded as an external
//! input of the referencing formula instead.

use std::collections::{BTreeSet, HashMap};

use super::cell_ref::CellRef;
use super::classify::Classified;
use super::refs::{Reference, extract_references};

#[derive(Clone, Debug)]
struct Node {
    at: CellRef,
    text: String,
    refs: Vec<Reference>,
    /// Formula cells this node reads, in first-reference order.
    precedents: Vec<CellRef>,
    /// Formula cells that read this node, in scan order of the reader.
    dependents: Vec<CellRef>,
    /// Keys of non-formula references.
    inputs: BTreeSet<String>,
}

/// Formula dependency graph of one sheet. Nodes keep scan order.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<CellRef, usize>,
}

impl DependencyGraph {
    /// Build the graph from classified cells.
    pub fn build(cells: &Classified) -> DependencyGraph {
        let mut graph = DependencyGraph::default();

        for (at, text) in cells.formulas() {
            graph.index.insert(at, graph.nodes.len());
            graph.nodes.push(Node {
                at,
                text: text.to_string(),
                refs: extract_references(text),
                precedents: Vec::new(),
                dependents: Vec::new(),
                inputs: BTreeSet::new(),
            });
        }

        for i in 0..graph.nodes.len() {
            let node_at = graph.nodes[i].at;
            let refs = std::mem::take(&mut graph.nodes[i].refs);

            for r in &refs {
                match r.at.filter(|at| graph.index.contains_key(at)) {
                    Some(dep) => graph.add_edge(dep, node_at),
                    None => {
                        graph.nodes[i].inputs.insert(r.key.clone());
                    }
                }
            }

            graph.nodes[i].refs = refs;
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        graph
    }

    fn add_edge(&mut self, from: CellRef, to: CellRef) {
        let to_idx = self.index[&to];
        if self.nodes[to_idx].precedents.contains(&from) {
            return;
        }
        self.nodes[to_idx].precedents.push(from);
        let from_idx = self.index[&from];
        self.nodes[from_idx].dependents.push(to);
    }

    fn node(&self, at: &CellRef) -> Option<&Node> {
        self.index.get(at).map(|&i| &self.nodes[i])
    }

    /// Formula cells in scan order.
    pub fn nodes(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.nodes.iter().map(|n| n.at)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, at: &CellRef) -> bool {
        self.index.contains_key(at)
    }

    /// Formula text of a node (marker stripped).
    pub fn formula(&self, at: &CellRef) -> Option<&str> {
        self.node(at).map(|n| n.text.as_str())
    }

    /// References extracted from a node's formula.
    pub fn references(&self, at: &CellRef) -> &[Reference] {
        self.node(at).map(|n| n.refs.as_slice()).unwrap_or(&[])
    }

    /// Formula cells that `at` reads.
    pub fn precedents(&self, at: &CellRef) -> &[CellRef] {
        self.node(at).map(|n| n.precedents.as_slice()).unwrap_or(&[])
    }

    /// Formula cells that read `at`.
    pub fn dependents(&self, at: &CellRef) -> &[CellRef] {
        self.node(at).map(|n| n.dependents.as_slice()).unwrap_or(&[])
    }

    pub fn in_degree(&self, at: &CellRef) -> usize {
        self.precedents(at).len()
    }

    /// Keys of the non-formula cells `at` reads, sorted.
    pub fn external_inputs(&self, at: &CellRef) -> impl Iterator<Item = &str> + '_ {
        self.node(at)
            .into_iter()
            .flat_map(|n| n.inputs.iter().map(String::as_str))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.precedents.len()).sum()
    }
}
