//! Error types for stairlight-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("duplicate element: {0}")]
    DuplicateElement(String),

    #[error("duplicate model: {0}")]
    DuplicateModel(String),

    #[error("element {element} references unknown model {model}")]
    UnknownModel { element: String, model: String },

    #[error("element {element} needs a {expected} model, but {model} is {actual}")]
    ModelKindMismatch {
        element: String,
        model: String,
        expected: String,
        actual: String,
    },

    #[error("node {node} is only connected to {element}")]
    DanglingNode { node: String, element: String },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
