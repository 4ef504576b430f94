//! Partitioning errors for metis-graph

use thiserror::Error;

use crate::graph_error::StructuralError;

/// Errors raised while handing a graph to a partitioner or checking its answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The configuration cannot be satisfied.
    #[error("invalid partitioner config: {0}")]
    InvalidConfig(&'static str),
    /// A value does not fit the partitioner's index type.
    #[error("{what} value {value} does not fit the partitioner index type")]
    IndexOverflow { what: &'static str, value: i128 },
    /// The external partitioner rejected the graph or failed to run.
    #[error("partitioner backend failed: {0}")]
    Backend(String),
    /// The assignment does not cover every node exactly once.
    #[error("partition has {actual} entries for {expected} nodes")]
    LengthMismatch { expected: usize, actual: usize },
    /// A node was assigned to a part outside `0..n_parts`.
    #[error("node {node} assigned to part {part}, but only {n_parts} parts exist")]
    PartOutOfRange {
        node: usize,
        part: usize,
        n_parts: usize,
    },
    #[error(transparent)]
    Structural(#[from] StructuralError),
}
