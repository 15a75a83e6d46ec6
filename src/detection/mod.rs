// Detection Module
// State model validation, work-vector reduction, resource-allocation graph

pub mod engine;
pub mod graph;
pub mod report;
pub mod types;
pub mod validation;

pub use engine::*;
pub use graph::{Edge, EdgeKind, Node, NodeColor, NodeKind, ResourceAllocationGraph};
pub use types::*;
pub use validation::*;
