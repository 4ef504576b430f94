//! Graph I/O.
//!
//! This module provides trait-based readers and writers for loading and
//! saving [`Graph`]s. The METIS text format lives in [`metis`].

pub mod metis;

use crate::graph::Graph;
use crate::graph_error::MetisGraphError;
use std::io::{Read, Write};

pub use metis::{MetisFormat, MetisHeader, MetisReader, MetisWriter, read_metis, write_metis};

/// Trait for graph readers.
pub trait GraphReader {
    /// Parse a graph from a reader.
    ///
    /// Either the whole input is accepted or an error is returned; no
    /// partially built graph is ever exposed.
    fn read<R: Read>(&self, reader: R) -> Result<Graph, MetisGraphError>;
}

/// Trait for graph writers.
pub trait GraphWriter {
    /// Serialize `graph` into `writer`.
    fn write<W: Write>(&self, writer: W, graph: &Graph) -> Result<(), MetisGraphError>;
}
