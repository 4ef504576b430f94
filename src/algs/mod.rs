//! Re-export public algorithms.

pub mod adjacency;

pub use adjacency::{CsrGraph, encode_adjacency};
