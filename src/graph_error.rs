//! Error types for metis-graph public APIs.
//!
//! Input problems are reported as [`FormatError`], internal consistency
//! violations as [`StructuralError`]. Both fold into [`MetisGraphError`],
//! which is what the readers and writers return.

use thiserror::Error;

/// Malformed METIS input. Always fatal to the parse call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Input ended before a non-comment header line was found.
    #[error("missing header line (input is empty or only comments)")]
    MissingHeader,
    /// The header line could not be decoded.
    #[error("line {line}: malformed header: {reason}")]
    MalformedHeader { line: usize, reason: String },
    /// The header's format code is not one of 0, 1, 10, 11.
    #[error("line {line}: unsupported format code `{code}` (expected 0, 1, 10 or 11)")]
    UnsupportedFormatCode { line: usize, code: String },
    /// The header requests more than one vertex-weight constraint.
    #[error("line {line}: unsupported constraint count {ncon} (only 1 is supported)")]
    UnsupportedConstraintCount { line: usize, ncon: u64 },
    /// A token that should be a non-negative integer is not.
    #[error("line {line}: invalid {what} `{token}`")]
    InvalidNumber {
        line: usize,
        what: &'static str,
        token: String,
    },
    /// An edge-weighted record has a neighbor id without its weight.
    #[error("line {line}: neighbor {neighbor} has no edge weight")]
    DanglingEdgeWeight { line: usize, neighbor: usize },
    /// A 1-based neighbor id outside `1..=node_count`.
    #[error("line {line}: neighbor {neighbor} out of range 1..={node_count}")]
    NeighborOutOfRange {
        line: usize,
        neighbor: usize,
        node_count: usize,
    },
    /// Both endpoints declare the same edge with different weights.
    #[error("line {line}: edge {u}-{v} declared with weight {first} and {second}")]
    AsymmetricEdgeWeight {
        line: usize,
        u: usize,
        v: usize,
        first: i64,
        second: i64,
    },
    /// Header counts disagree with the parsed content.
    #[error("header/content mismatch: header declares {expected} {what}, found {actual}")]
    CountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Internal consistency violation in a graph or its CSR encoding.
///
/// This signals a defect in whatever built the graph, never bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Flattened adjacency is not twice the undirected edge count.
    #[error("adjacency holds {actual} entries, expected 2 * {edge_count} = {expected}")]
    AdjacencyLength {
        edge_count: usize,
        expected: usize,
        actual: usize,
    },
    /// Offsets array is the wrong length, does not start at zero, or decreases.
    #[error("invalid offsets at index {index}: {reason}")]
    Offsets { index: usize, reason: &'static str },
    /// A neighbor index is not a valid node id.
    #[error("node {node} has neighbor {neighbor} but only {node_count} nodes exist")]
    NeighborOutOfRange {
        node: usize,
        neighbor: usize,
        node_count: usize,
    },
    /// `v` appears in `u`'s list but `u` is missing from `v`'s.
    #[error("edge {u}->{v} has no reverse entry")]
    AsymmetricAdjacency { u: usize, v: usize },
    /// A weight array is not aligned with what it annotates.
    #[error("{what} weights hold {actual} entries, expected {expected}")]
    WeightLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Unified error type for metis-graph I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetisGraphError {
    /// Underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(String),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl From<std::io::Error> for MetisGraphError {
    fn from(err: std::io::Error) -> Self {
        MetisGraphError::Io(err.to_string())
    }
}
