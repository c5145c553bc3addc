//! Error types for component construction and parameter maps.

use pf_core::error::PfError;
use thiserror::Error;

/// Errors that can occur when building components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Parameter map is missing entry for '{key}'")]
    MissingParam { key: String },

    #[error("Non-finite value for parameter '{key}'")]
    NonFinite { key: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::InvalidArg { what } => PfError::InvalidArg { what },
            ComponentError::MissingParam { key: _ } => PfError::InvalidArg {
                what: "missing mandatory parameter",
            },
            ComponentError::NonFinite { key: _ } => PfError::InvalidArg {
                what: "non-finite parameter value",
            },
        }
    }
}
