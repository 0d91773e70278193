//! Error types for the catalog model.

use thiserror::Error;

/// Errors raised while parsing identifiers or loading catalog snapshots.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The object type name is not one of the supported entity kinds.
    #[error("unsupported object type: {name}")]
    UnknownKind { name: String },

    /// An identifier could not be parsed.
    #[error("invalid {kind} identifier: {value}")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// A catalog snapshot could not be decoded.
    #[error("invalid catalog snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
