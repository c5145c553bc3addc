//! pf-graph: graph/model layer for powerflow.
//!
//! Provides:
//! - The mutable power tree (`PowerGraph`, `Node`) with validated
//!   structural operations
//! - A frozen `Topology` snapshot for solver integration
//! - The operating-phase registry and the parameter report
//!
//! # Example
//!
//! ```
//! use pf_components::{Converter, PowerLoad, Source};
//! use pf_graph::PowerGraph;
//!
//! let mut graph = PowerGraph::new("demo", Source::new("battery", 3.0, 13e-3));
//! graph.add_comp("battery", Converter::new("Buck 1.8V", 1.8, 0.87).unwrap()).unwrap();
//! graph.add_comp("Buck 1.8V", PowerLoad::new("MCU", 27e-3)).unwrap();
//!
//! let top = graph.topology();
//! assert_eq!(top.len(), 3);
//! assert_eq!(top.domain(2), "battery");
//! ```

pub mod error;
pub mod graph;
pub mod topology;

// Re-exports for ergonomics
pub use error::{GraphError, GraphResult};
pub use graph::{Node, ParamRow, PowerGraph};
pub use topology::Topology;
