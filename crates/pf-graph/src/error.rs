//! Graph-specific error types.

use pf_core::PfError;
use thiserror::Error;

/// Graph construction and mutation errors.
///
/// Every failed mutation leaves the graph exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown parent component '{0}'")]
    UnknownParent(String),

    #[error("Unknown component '{0}'")]
    UnknownComponent(String),

    #[error("Component name '{0}' is already in use")]
    DuplicateName(String),

    #[error("'{parent}' ({parent_kind}) cannot have a {child_kind} child")]
    ChildNotAllowed {
        parent: String,
        parent_kind: &'static str,
        child_kind: &'static str,
    },

    #[error("'{0}' is not a source")]
    NotASource(String),

    #[error("Root '{0}' can only be replaced by a source")]
    RootMustBeSource(String),

    #[error("Cannot delete '{0}': it is the last source")]
    LastSource(String),

    #[error("Cannot reattach children of root '{0}'")]
    RootReattach(String),

    #[error("Phase '{phase}' referenced by component '{component}' is not declared")]
    UnknownPhase { phase: String, component: String },

    #[error("'All' is a reserved phase name")]
    ReservedPhase,
}

pub type GraphResult<T> = Result<T, GraphError>;

impl From<GraphError> for PfError {
    fn from(err: GraphError) -> Self {
        PfError::Invariant {
            what: Box::leak(err.to_string().into_boxed_str()),
        }
    }
}
