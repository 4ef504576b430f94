#![allow(dead_code)]
use std::collections::BTreeSet;

use metis_graph::{
    graph::Graph,
    graph_error::{FormatError, MetisGraphError},
    io::MetisReader,
};

pub fn parse(text: &str) -> Graph {
    MetisReader
        .parse_str(text)
        .unwrap_or_else(|e| panic!("fixture should parse: {e}\n{text}"))
}

pub fn format_err(text: &str) -> FormatError {
    match MetisReader.parse_str(text) {
        Err(MetisGraphError::Format(e)) => e,
        other => panic!("expected FormatError, got {other:?}"),
    }
}

/// Neighbor ids of `node` as a set.
pub fn neighbor_set(graph: &Graph, node: usize) -> BTreeSet<usize> {
    graph.neighbors(node).iter().map(|n| n.id).collect()
}

/// Rebuild per-node neighbor sets from CSR arrays.
pub fn csr_sets(offsets: &[usize], neighbors: &[usize]) -> Vec<BTreeSet<usize>> {
    offsets
        .windows(2)
        .map(|w| neighbors[w[0]..w[1]].iter().copied().collect())
        .collect()
}

/// `(u, v, weight)` with `u < v`, sorted.
pub fn sorted_edges(graph: &Graph) -> Vec<(usize, usize, Option<i64>)> {
    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_unstable();
    edges
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
