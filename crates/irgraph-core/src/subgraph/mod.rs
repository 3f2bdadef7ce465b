//! Working subgraph of the ontology.
//!
//! - [`model`] - the node/relationship store with the leaf-node view
//! - [`builder`] - bounded breadth-first construction and expansion

pub mod builder;
pub mod model;

pub use builder::{BuildReport, SubgraphBuilder};
pub use model::{MergeStats, NodeRecord, Relationship, Subgraph, SubgraphView};
