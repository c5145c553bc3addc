//! Error types for solver operations.

use pf_core::PfError;
use pf_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while solving a power tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The relaxation did not settle within the iteration cap.
    /// No partial result table is produced.
    #[error("No convergence after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("Unknown phase '{0}'")]
    UnknownPhase(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ConvergenceFailed { .. } => PfError::InvalidArg {
                what: "convergence",
            },
            SolverError::UnknownPhase(_) => PfError::InvalidArg { what: "phase" },
            SolverError::Graph(err) => err.into(),
        }
    }
}
