use std::collections::HashSet;

use crate::graph_error::StructuralError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), StructuralError>;
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Check that `adjacency` is symmetric over `0..node_count`: every
/// `u -> v` has a matching `v -> u`, and every neighbor is in range.
///
/// `adjacency(u)` returns the neighbor ids of `u`. Used by both the
/// list-based [`Graph`](crate::graph::Graph) and the flat
/// [`CsrGraph`](crate::algs::adjacency::CsrGraph).
pub(crate) fn check_symmetric<F, I>(node_count: usize, adjacency: F) -> Result<(), StructuralError>
where
    F: Fn(usize) -> I,
    I: Iterator<Item = usize>,
{
    let mut arcs: HashSet<(usize, usize)> = HashSet::new();
    for u in 0..node_count {
        for v in adjacency(u) {
            if v >= node_count {
                return Err(StructuralError::NeighborOutOfRange {
                    node: u,
                    neighbor: v,
                    node_count,
                });
            }
            arcs.insert((u, v));
        }
    }
    for u in 0..node_count {
        for v in adjacency(u) {
            if !arcs.contains(&(v, u)) {
                return Err(StructuralError::AsymmetricAdjacency { u, v });
            }
        }
    }
    Ok(())
}
