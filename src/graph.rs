//! Undirected, optionally weighted graph produced by the METIS reader.
//!
//! A [`Graph`] is assembled through a [`GraphBuilder`] and is immutable once
//! built. Node ids are `0..node_count` in insertion order. Every edge is
//! recorded in both endpoints' adjacency lists, so the summed degree is
//! always `2 * edge_count`.

use std::collections::HashMap;

use crate::debug_invariants::{DebugInvariants, check_symmetric};
use crate::graph_error::StructuralError;

/// Scalar type of node and edge weights.
pub type Weight = i64;

/// One adjacency entry: the neighbor id and the weight of the connecting edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub id: usize,
    /// `None` when the graph carries no edge weights.
    pub weight: Option<Weight>,
}

/// Immutable undirected graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    node_weights: Vec<Weight>,
    adjacency: Vec<Vec<Neighbor>>,
    edge_count: usize,
    has_node_weights: bool,
    has_edge_weights: bool,
}

impl Graph {
    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_weights.len()
    }

    /// Number of undirected edges (each unordered pair counted once).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_weights.is_empty()
    }

    /// Whether node weights were declared by the source.
    pub fn has_node_weights(&self) -> bool {
        self.has_node_weights
    }

    /// Whether edge weights were declared by the source.
    pub fn has_edge_weights(&self) -> bool {
        self.has_edge_weights
    }

    /// Weight of `node`, or `None` if the node does not exist.
    ///
    /// Nodes without an explicit weight report 0.
    pub fn node_weight(&self, node: usize) -> Option<Weight> {
        self.node_weights.get(node).copied()
    }

    /// All node weights, indexed by node id.
    pub fn node_weights(&self) -> &[Weight] {
        &self.node_weights
    }

    /// Adjacency list of `node` in insertion order.
    ///
    /// # Panics
    /// If `node >= self.node_count()`.
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[Neighbor] {
        &self.adjacency[node]
    }

    /// Number of neighbors of `node`.
    ///
    /// # Panics
    /// If `node >= self.node_count()`.
    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Every undirected edge once, as `(u, v, weight)` with `u < v`,
    /// ordered by `u` then by `u`'s adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Option<Weight>)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, nbrs)| {
            nbrs.iter()
                .filter(move |n| u < n.id)
                .map(move |n| (u, n.id, n.weight))
        })
    }

    /// Build a graph directly from parts, bypassing the builder's checks.
    #[cfg(test)]
    pub(crate) fn from_raw_parts(
        node_weights: Vec<Weight>,
        adjacency: Vec<Vec<Neighbor>>,
        edge_count: usize,
    ) -> Self {
        Self {
            node_weights,
            adjacency,
            edge_count,
            has_node_weights: false,
            has_edge_weights: false,
        }
    }
}

impl DebugInvariants for Graph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Graph");
    }

    fn validate_invariants(&self) -> Result<(), StructuralError> {
        if self.adjacency.len() != self.node_weights.len() {
            return Err(StructuralError::WeightLength {
                what: "node",
                expected: self.adjacency.len(),
                actual: self.node_weights.len(),
            });
        }
        let entries: usize = self.adjacency.iter().map(Vec::len).sum();
        if entries != 2 * self.edge_count {
            return Err(StructuralError::AdjacencyLength {
                edge_count: self.edge_count,
                expected: 2 * self.edge_count,
                actual: entries,
            });
        }
        check_symmetric(self.node_count(), |u| {
            self.adjacency[u].iter().map(|n| n.id)
        })
    }
}

/// Outcome of [`GraphBuilder::add_edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The unordered pair was new and has been recorded on both endpoints.
    Inserted,
    /// The pair already existed with a compatible weight; nothing changed.
    Duplicate,
    /// The pair already existed with a different weight; nothing changed.
    WeightConflict { existing: Weight },
    /// `u == v`; loops are not representable and nothing changed.
    SelfLoop,
}

/// Incremental builder for [`Graph`].
///
/// Edges may reference nodes that have not been added yet; `build` fails if
/// any of them is still missing at the end.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    node_weights: Vec<Weight>,
    adjacency: Vec<Vec<Neighbor>>,
    edges: HashMap<(usize, usize), Option<Weight>>,
    has_node_weights: bool,
    has_edge_weights: bool,
}

impl GraphBuilder {
    /// Empty builder; the flags record which weight channels the source declared.
    pub fn new(has_node_weights: bool, has_edge_weights: bool) -> Self {
        Self {
            has_node_weights,
            has_edge_weights,
            ..Self::default()
        }
    }

    /// Like [`new`](Self::new) with room for `nodes` nodes and `edges` edges.
    pub fn with_capacity(
        nodes: usize,
        edges: usize,
        has_node_weights: bool,
        has_edge_weights: bool,
    ) -> Self {
        Self {
            node_weights: Vec::with_capacity(nodes),
            adjacency: Vec::with_capacity(nodes),
            edges: HashMap::with_capacity(edges),
            has_node_weights,
            has_edge_weights,
        }
    }

    /// Append a node and return its id.
    ///
    /// A non-zero weight turns the node-weight channel on.
    pub fn add_node(&mut self, weight: Weight) -> usize {
        if weight != 0 {
            self.has_node_weights = true;
        }
        let id = self.node_weights.len();
        self.node_weights.push(weight);
        self.ensure_slot(id);
        id
    }

    /// Nodes added so far.
    pub fn node_count(&self) -> usize {
        self.node_weights.len()
    }

    /// Distinct undirected edges added so far.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Record the undirected edge `{u, v}`.
    ///
    /// Re-inserting a known pair is idempotent. A weight given on either
    /// declaration is kept; two differing weights are reported as a conflict.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: Option<Weight>) -> EdgeInsert {
        if u == v {
            return EdgeInsert::SelfLoop;
        }
        let key = (u.min(v), u.max(v));
        if let Some(existing) = self.edges.get_mut(&key) {
            return match (*existing, weight) {
                (Some(a), Some(b)) if a != b => EdgeInsert::WeightConflict { existing: a },
                (None, Some(_)) => {
                    *existing = weight;
                    Self::set_weight(&mut self.adjacency[u], v, weight);
                    Self::set_weight(&mut self.adjacency[v], u, weight);
                    EdgeInsert::Duplicate
                }
                _ => EdgeInsert::Duplicate,
            };
        }
        self.edges.insert(key, weight);
        self.ensure_slot(key.1);
        self.adjacency[u].push(Neighbor { id: v, weight });
        self.adjacency[v].push(Neighbor { id: u, weight });
        EdgeInsert::Inserted
    }

    /// Freeze into a [`Graph`].
    ///
    /// Fails if an edge references a node that was never added.
    pub fn build(self) -> Result<Graph, StructuralError> {
        let node_count = self.node_weights.len();
        if self.adjacency.len() > node_count {
            let (node, neighbor) = self
                .adjacency
                .iter()
                .enumerate()
                .find_map(|(u, nbrs)| {
                    nbrs.iter().find(|n| n.id >= node_count).map(|n| (u, n.id))
                })
                .unwrap_or((node_count, node_count));
            return Err(StructuralError::NeighborOutOfRange {
                node,
                neighbor,
                node_count,
            });
        }
        let graph = Graph {
            node_weights: self.node_weights,
            adjacency: self.adjacency,
            edge_count: self.edges.len(),
            has_node_weights: self.has_node_weights,
            has_edge_weights: self.has_edge_weights,
        };
        graph.debug_assert_invariants();
        Ok(graph)
    }

    fn ensure_slot(&mut self, id: usize) {
        if self.adjacency.len() <= id {
            self.adjacency.resize_with(id + 1, Vec::new);
        }
    }

    fn set_weight(list: &mut [Neighbor], target: usize, weight: Option<Weight>) {
        if let Some(entry) = list.iter_mut().find(|n| n.id == target) {
            entry.weight = weight;
        }
    }
}
