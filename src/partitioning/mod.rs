//! Entry-point for handing graphs to an external partitioner.
//!
//! The partitioning algorithm itself lives outside this crate. Callers pick
//! an implementation of [`Partitioner`] (with the `metis-support` feature,
//! [`MetisPartitioner`](crate::partitioning::metis::MetisPartitioner)) and
//! feed it through [`partition_graph`], which encodes the graph, drops
//! the weight channels the config disables, and checks the answer.

pub mod error;
#[cfg(feature = "metis-support")]
pub mod metis;

pub use error::PartitionError;

use serde::{Deserialize, Serialize};

use crate::algs::adjacency::CsrGraph;
use crate::graph::Graph;

pub type PartId = usize;

/// Partitioning scheme requested from the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMethod {
    /// Multilevel k-way partitioning.
    #[default]
    Kway,
    /// Multilevel recursive bisection.
    Recursive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionerConfig {
    pub n_parts: usize,
    pub method: PartitionMethod,
    /// Pass node weights (`vwgt`) when the graph has them.
    pub use_node_weights: bool,
    /// Pass edge weights (`adjwgt`) when the graph has them.
    pub use_edge_weights: bool,
    /// Seed for the backend's random number generator.
    pub seed: Option<u64>,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            n_parts: 2,
            method: PartitionMethod::Kway,
            use_node_weights: true,
            use_edge_weights: true,
            seed: None,
        }
    }
}

impl PartitionerConfig {
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.n_parts == 0 {
            return Err(PartitionError::InvalidConfig("n_parts must be at least 1"));
        }
        Ok(())
    }
}

/// Part assignment returned by a [`Partitioner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// For each node i, `parts[i]` ∈ `0..n_parts`.
    pub parts: Vec<PartId>,
    /// Objective reported by the backend (edge cut or communication volume).
    pub objective: Option<i64>,
}

impl Partition {
    /// Check that every node of `csr` is assigned to a part below `n_parts`.
    pub fn validate(&self, csr: &CsrGraph, n_parts: usize) -> Result<(), PartitionError> {
        if self.parts.len() != csr.node_count() {
            return Err(PartitionError::LengthMismatch {
                expected: csr.node_count(),
                actual: self.parts.len(),
            });
        }
        if let Some((node, &part)) = self.parts.iter().enumerate().find(|(_, p)| **p >= n_parts) {
            return Err(PartitionError::PartOutOfRange {
                node,
                part,
                n_parts,
            });
        }
        Ok(())
    }

    /// Number of nodes in each part.
    pub fn part_sizes(&self, n_parts: usize) -> Vec<usize> {
        let mut sizes = vec![0; n_parts];
        for &p in &self.parts {
            if let Some(slot) = sizes.get_mut(p) {
                *slot += 1;
            }
        }
        sizes
    }
}

/// An external graph partitioner consuming CSR arrays.
///
/// Arrays are 0-based; `xadj[i]..xadj[i+1]` bounds node `i`'s slice of
/// `adjncy`. Weight arrays are parallel to node id / adjacency position
/// and are `None` when absent.
pub trait Partitioner {
    fn partition(&self, csr: &CsrGraph, cfg: &PartitionerConfig) -> Result<Partition, PartitionError>;
}

/// Encode `graph`, hand it to `partitioner`, and validate the assignment.
pub fn partition_graph<P>(
    partitioner: &P,
    graph: &Graph,
    cfg: &PartitionerConfig,
) -> Result<Partition, PartitionError>
where
    P: Partitioner + ?Sized,
{
    cfg.validate()?;
    let mut csr = CsrGraph::from_graph(graph)?;
    if !cfg.use_node_weights {
        csr.vwgt = None;
    }
    if !cfg.use_edge_weights {
        csr.adjwgt = None;
    }
    log::debug!(
        "partitioning {} nodes / {} edges into {} parts ({:?})",
        csr.node_count(),
        csr.edge_count(),
        cfg.n_parts,
        cfg.method
    );
    let partition = partitioner.partition(&csr, cfg)?;
    partition.validate(&csr, cfg.n_parts)?;
    if let Some(objective) = partition.objective {
        log::debug!("partitioner objective: {objective}");
    }
    Ok(partition)
}
