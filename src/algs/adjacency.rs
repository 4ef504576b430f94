//! Flatten a [`Graph`] into CSR (compressed-sparse-row) arrays.
//
// Layout, as expected by METIS-style partitioners:
//
// * `xadj[i] .. xadj[i+1]`   = neighbour slice of node *i* in `adjncy`
// * `adjncy`                 = concatenated neighbour ids, 0-based
// * `vwgt[i]`                = (optional) weight of node *i*
// * `adjwgt[k]`              = (optional) weight of edge `adjncy[k]`
//
// Every undirected edge appears in both endpoints' slices, so
// `adjncy.len() == 2 * edge_count`.

use serde::{Deserialize, Serialize};

use crate::debug_invariants::{DebugInvariants, check_symmetric};
use crate::graph::{Graph, Weight};
use crate::graph_error::StructuralError;

/// Encode `graph` as `(offsets, neighbors)`.
///
/// Nodes are visited in ascending id order and each node's neighbors keep
/// the graph's adjacency order. `offsets` has `node_count + 1` entries and
/// starts at 0.
pub fn encode_adjacency(graph: &Graph) -> Result<(Vec<usize>, Vec<usize>), StructuralError> {
    let n = graph.node_count();
    let mut offsets = Vec::with_capacity(n + 1);
    let mut neighbors = Vec::with_capacity(2 * graph.edge_count());
    offsets.push(0);
    for node in 0..n {
        neighbors.extend(graph.neighbors(node).iter().map(|nbr| nbr.id));
        offsets.push(neighbors.len());
    }
    check_adjacency_len(graph.edge_count(), neighbors.len())?;
    Ok((offsets, neighbors))
}

fn check_adjacency_len(edge_count: usize, actual: usize) -> Result<(), StructuralError> {
    let expected = 2 * edge_count;
    if actual != expected {
        return Err(StructuralError::AdjacencyLength {
            edge_count,
            expected,
            actual,
        });
    }
    Ok(())
}

/// CSR arrays plus the optional weight channels handed to a partitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrGraph {
    /// CSR offsets into `adjncy` for each node.
    pub xadj: Vec<usize>,
    /// CSR adjacency list.
    pub adjncy: Vec<usize>,
    /// Node weights by node id; `None` when the graph has none.
    pub vwgt: Option<Vec<Weight>>,
    /// Edge weights aligned with `adjncy`; `None` when edges are unweighted.
    pub adjwgt: Option<Vec<Weight>>,
}

impl CsrGraph {
    /// Encode `graph` including whichever weight channels it declares.
    pub fn from_graph(graph: &Graph) -> Result<Self, StructuralError> {
        let (xadj, adjncy) = encode_adjacency(graph)?;
        let vwgt = graph
            .has_node_weights()
            .then(|| graph.node_weights().to_vec());
        let adjwgt = graph.has_edge_weights().then(|| {
            (0..graph.node_count())
                .flat_map(|node| graph.neighbors(node).iter().map(|nbr| nbr.weight.unwrap_or(0)))
                .collect::<Vec<_>>()
        });
        let csr = Self {
            xadj,
            adjncy,
            vwgt,
            adjwgt,
        };
        csr.debug_assert_invariants();
        log::debug!(
            "encoded CSR: {} nodes, {} adjacency entries, vwgt={}, adjwgt={}",
            csr.node_count(),
            csr.adjncy.len(),
            csr.vwgt.is_some(),
            csr.adjwgt.is_some()
        );
        Ok(csr)
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.adjncy.len() / 2
    }

    /// Return the neighbor index slice for node `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjncy[self.xadj[i]..self.xadj[i + 1]]
    }

    /// Return the neighbor weight slice for node `i`, if present.
    #[inline]
    pub fn neighbor_weights(&self, i: usize) -> Option<&[Weight]> {
        self.adjwgt
            .as_ref()
            .map(|w| &w[self.xadj[i]..self.xadj[i + 1]])
    }
}

impl DebugInvariants for CsrGraph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CsrGraph");
    }

    fn validate_invariants(&self) -> Result<(), StructuralError> {
        match self.xadj.first() {
            Some(0) => {}
            Some(_) => {
                return Err(StructuralError::Offsets {
                    index: 0,
                    reason: "first offset must be 0",
                });
            }
            None => {
                return Err(StructuralError::Offsets {
                    index: 0,
                    reason: "offsets must hold node_count + 1 entries",
                });
            }
        }
        if let Some(index) = self.xadj.windows(2).position(|w| w[0] > w[1]) {
            return Err(StructuralError::Offsets {
                index: index + 1,
                reason: "offsets must be non-decreasing",
            });
        }
        let last = self.xadj.len() - 1;
        if self.xadj[last] != self.adjncy.len() {
            return Err(StructuralError::Offsets {
                index: last,
                reason: "last offset must equal the adjacency length",
            });
        }
        if self.adjncy.len() % 2 != 0 {
            return Err(StructuralError::AdjacencyLength {
                edge_count: self.edge_count(),
                expected: 2 * self.edge_count(),
                actual: self.adjncy.len(),
            });
        }
        let n = self.node_count();
        if let Some(vwgt) = &self.vwgt {
            if vwgt.len() != n {
                return Err(StructuralError::WeightLength {
                    what: "node",
                    expected: n,
                    actual: vwgt.len(),
                });
            }
        }
        if let Some(adjwgt) = &self.adjwgt {
            if adjwgt.len() != self.adjncy.len() {
                return Err(StructuralError::WeightLength {
                    what: "edge",
                    expected: self.adjncy.len(),
                    actual: adjwgt.len(),
                });
            }
        }
        check_symmetric(n, |u| self.neighbors(u).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, Neighbor};
    use crate::io::MetisReader;

    // path 0 - 1 - 2 plus an isolated node 3
    fn path_graph() -> Graph {
        let mut b = GraphBuilder::new(false, false);
        for _ in 0..4 {
            b.add_node(0);
        }
        b.add_edge(0, 1, None);
        b.add_edge(1, 2, None);
        b.build().unwrap()
    }

    #[test]
    fn encode_path_graph() {
        let (offsets, neighbors) = encode_adjacency(&path_graph()).unwrap();
        assert_eq!(offsets, vec![0, 1, 3, 4, 4]);
        assert_eq!(neighbors, vec![1, 0, 2, 1]);
    }

    #[test]
    fn encode_empty_graph() {
        let g = GraphBuilder::default().build().unwrap();
        let (offsets, neighbors) = encode_adjacency(&g).unwrap();
        assert_eq!(offsets, vec![0]);
        assert!(neighbors.is_empty());
        let csr = CsrGraph::from_graph(&g).unwrap();
        assert_eq!(csr.node_count(), 0);
    }

    #[test]
    fn inconsistent_graph_is_a_structural_error() {
        // node 0 lists 1 but the edge count claims two edges
        let g = Graph::from_raw_parts(
            vec![0, 0],
            vec![
                vec![Neighbor { id: 1, weight: None }],
                vec![Neighbor { id: 0, weight: None }],
            ],
            2,
        );
        assert_eq!(
            encode_adjacency(&g),
            Err(StructuralError::AdjacencyLength {
                edge_count: 2,
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn one_sided_adjacency_is_a_structural_error() {
        let g = Graph::from_raw_parts(
            vec![0, 0, 0],
            vec![
                vec![Neighbor { id: 1, weight: None }],
                vec![],
                vec![Neighbor { id: 1, weight: None }],
            ],
            1,
        );
        let (xadj, adjncy) = encode_adjacency(&g).unwrap();
        let csr = CsrGraph {
            xadj,
            adjncy,
            vwgt: None,
            adjwgt: None,
        };
        assert_eq!(
            csr.validate_invariants(),
            Err(StructuralError::AsymmetricAdjacency { u: 0, v: 1 })
        );
    }

    #[test]
    fn weights_follow_adjacency_positions() {
        let g = MetisReader
            .parse_str("3 2 11\n1 2 5 3 7\n2 1 5\n3 1 7\n")
            .unwrap();
        let csr = CsrGraph::from_graph(&g).unwrap();
        assert_eq!(csr.xadj, vec![0, 2, 3, 4]);
        assert_eq!(csr.adjncy, vec![1, 2, 0, 0]);
        assert_eq!(csr.vwgt, Some(vec![1, 2, 3]));
        assert_eq!(csr.adjwgt, Some(vec![5, 7, 5, 7]));
        assert_eq!(csr.neighbor_weights(0), Some(&[5, 7][..]));
        csr.validate_invariants().unwrap();
    }

    #[test]
    fn unweighted_graph_omits_weight_arrays() {
        let csr = CsrGraph::from_graph(&path_graph()).unwrap();
        assert!(csr.vwgt.is_none());
        assert!(csr.adjwgt.is_none());
        assert_eq!(csr.neighbors(1), &[0, 2]);
        assert_eq!(csr.edge_count(), 2);
    }

    #[test]
    fn builder_node_weights_reach_vwgt() {
        let mut b = GraphBuilder::new(false, false);
        b.add_node(5);
        b.add_node(0);
        b.add_edge(0, 1, None);
        let csr = CsrGraph::from_graph(&b.build().unwrap()).unwrap();
        assert_eq!(csr.vwgt, Some(vec![5, 0]));
        assert!(csr.adjwgt.is_none());
    }

    #[test]
    fn bad_offsets_are_reported() {
        let csr = CsrGraph {
            xadj: vec![0, 2, 1, 2],
            adjncy: vec![1, 0],
            vwgt: None,
            adjwgt: None,
        };
        assert!(matches!(
            csr.validate_invariants(),
            Err(StructuralError::Offsets { index: 2, .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let csr = CsrGraph::from_graph(&path_graph()).unwrap();
        let ser = serde_json::to_string(&csr).expect("serialize");
        let de: CsrGraph = serde_json::from_str(&ser).expect("deserialize");
        assert_eq!(csr, de);
    }
}
