//! [`Partitioner`] backed by the METIS library.
//!
//! Only a pass-through: CSR arrays are converted to `metis::Idx` and handed
//! to `METIS_PartGraphKway` / `METIS_PartGraphRecursive`.

use ::metis::Idx;

use crate::algs::adjacency::CsrGraph;
use crate::partitioning::{
    Partition, PartitionError, PartitionMethod, Partitioner, PartitionerConfig,
};

#[derive(Debug, Default, Clone)]
pub struct MetisPartitioner;

fn to_idx<T>(values: &[T], what: &'static str) -> Result<Vec<Idx>, PartitionError>
where
    T: Copy + Into<i128> + TryInto<Idx>,
{
    values
        .iter()
        .map(|&v| {
            v.try_into().map_err(|_| PartitionError::IndexOverflow {
                what,
                value: v.into(),
            })
        })
        .collect()
}

fn usize_to_idx(values: &[usize], what: &'static str) -> Result<Vec<Idx>, PartitionError> {
    values
        .iter()
        .map(|&v| {
            Idx::try_from(v).map_err(|_| PartitionError::IndexOverflow {
                what,
                value: v as i128,
            })
        })
        .collect()
}

impl Partitioner for MetisPartitioner {
    fn partition(
        &self,
        csr: &CsrGraph,
        cfg: &PartitionerConfig,
    ) -> Result<Partition, PartitionError> {
        cfg.validate()?;
        let n = csr.node_count();
        if n == 0 {
            return Ok(Partition {
                parts: Vec::new(),
                objective: Some(0),
            });
        }

        let xadj = usize_to_idx(&csr.xadj, "xadj")?;
        let adjncy = usize_to_idx(&csr.adjncy, "adjncy")?;
        let vwgt = csr
            .vwgt
            .as_deref()
            .map(|w| to_idx(w, "vwgt"))
            .transpose()?;
        let adjwgt = csr
            .adjwgt
            .as_deref()
            .map(|w| to_idx(w, "adjwgt"))
            .transpose()?;
        let nparts = Idx::try_from(cfg.n_parts).map_err(|_| PartitionError::IndexOverflow {
            what: "n_parts",
            value: cfg.n_parts as i128,
        })?;
        let mut part: Vec<Idx> = vec![0; n];

        let mut graph = ::metis::Graph::new(1, nparts, &xadj, &adjncy)
            .map_err(|e| PartitionError::Backend(e.to_string()))?;
        if let Some(vwgt) = &vwgt {
            graph = graph.set_vwgt(vwgt);
        }
        if let Some(adjwgt) = &adjwgt {
            graph = graph.set_adjwgt(adjwgt);
        }
        if let Some(seed) = cfg.seed {
            // METIS seeds are C ints; fold wider seeds into range
            graph = graph.set_option(::metis::option::Seed((seed % Idx::MAX as u64) as Idx));
        }

        let objval = match cfg.method {
            PartitionMethod::Kway => graph.part_kway(&mut part),
            PartitionMethod::Recursive => graph.part_recursive(&mut part),
        }
        .map_err(|e| PartitionError::Backend(e.to_string()))?;

        let parts = part
            .into_iter()
            .map(|p| {
                usize::try_from(p).map_err(|_| PartitionError::Backend(format!(
                    "METIS returned negative part id {p}"
                )))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("METIS {:?} finished, objective {objval}", cfg.method);
        Ok(Partition {
            parts,
            objective: Some(objval.into()),
        })
    }
}
