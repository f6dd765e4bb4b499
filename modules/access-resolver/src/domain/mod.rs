//! Domain layer: assignment graph, membership expansion, resolution, filtering.

pub mod error;
pub mod filter;
pub mod graph;
pub mod membership;
pub mod model;
pub mod resolver;
