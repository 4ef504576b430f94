#![cfg_attr(docsrs, feature(doc_cfg))]
//! # metis-graph
//!
//! metis-graph loads graphs stored in the METIS text format into a
//! validated in-memory [`Graph`](graph::Graph), flattens them into the CSR
//! arrays expected by graph partitioners, and optionally hands those arrays
//! to the METIS library.
//!
//! ## Features
//! - Streaming METIS reader with line-numbered diagnostics ([`io::MetisReader`])
//! - METIS writer producing files that read back to the same graph ([`io::MetisWriter`])
//! - CSR encoding with optional node and edge weight arrays ([`algs::CsrGraph`])
//! - A narrow [`Partitioner`](partitioning::Partitioner) seam; enable
//!   `metis-support` for the METIS-backed implementation
//!
//! ## Usage
//!
//! ```
//! use metis_graph::prelude::*;
//!
//! let graph = MetisReader.parse_str("3 2\n2\n1 3\n2\n").unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//!
//! let (offsets, neighbors) = encode_adjacency(&graph).unwrap();
//! assert_eq!(offsets, vec![0, 1, 3, 4]);
//! assert_eq!(neighbors, vec![1, 0, 2, 1]);
//! ```
//!
//! ## Logging
//! Diagnostics go through the [`log`] facade; install any logger to see them.

pub mod algs;
pub mod debug_invariants;
pub mod graph;
pub mod graph_error;
pub mod io;
pub mod partitioning;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::adjacency::{CsrGraph, encode_adjacency};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::graph::{Graph, GraphBuilder, Neighbor, Weight};
    pub use crate::graph_error::{FormatError, MetisGraphError, StructuralError};
    pub use crate::io::{
        GraphReader, GraphWriter, MetisFormat, MetisHeader, MetisReader, MetisWriter, read_metis,
        write_metis,
    };
    #[cfg(feature = "metis-support")]
    pub use crate::partitioning::metis::MetisPartitioner;
    pub use crate::partitioning::{
        Partition, PartitionError, PartitionMethod, Partitioner, PartitionerConfig,
        partition_graph,
    };
}
