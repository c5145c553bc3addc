//! pf-project: system file format for power-tree projects.
//!
//! A system file is a JSON document holding the graph name, the file
//! format version, the declared operating phases, and one entry per
//! source root with its subtree. Loading rebuilds a
//! [`pf_graph::PowerGraph`] through the normal mutation API, so a file
//! that violates a graph invariant is rejected rather than admitted.

pub mod io;
pub mod schema;

pub use io::{from_json, load, save, to_json};
pub use schema::{ComponentDef, ParamsDef, RootDef, SystemFile};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown component type: {0}")]
    UnknownKind(String),

    #[error("System file has no source entries")]
    NoSources,

    #[error("Root entry {0} is not a source")]
    RootMustBeSource(String),

    #[error("Childs entry references unknown parent: {0}")]
    UnresolvedParent(String),

    #[error("Component error: {0}")]
    Component(#[from] pf_components::ComponentError),

    #[error("Graph error: {0}")]
    Graph(#[from] pf_graph::GraphError),
}
