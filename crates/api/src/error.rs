//! Error types for the rendering layer.
//!
//! Every error maps onto a numeric code and can be turned into an error
//! document, so callers always have a well-formed body to send back.
//!
//! | Error | Code |
//! |-------|------|
//! | UnsupportedType, InvalidFormat, InvalidInclude, UnsupportedInclude, InvalidIdentifier | 400 |
//! | NotFound | 404 |
//! | Config, Url, Serialization | 500 |

use cadence_model::{EntityKind, EntityRef, ModelError};
use cadence_serde::SerdeError;
use thiserror::Error;

use crate::context::Format;
use crate::document::DocumentAssembler;
use crate::include::Include;

/// Errors raised while preparing or rendering a document.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested object type is not one the renderer supports.
    #[error("unsupported object type: {0}")]
    UnsupportedType(String),

    /// The output format token is not recognized.
    #[error("invalid output format: {0}")]
    InvalidFormat(String),

    /// An include token is not recognized.
    #[error("invalid include: {0}")]
    InvalidInclude(String),

    /// The include exists but cannot be expanded on this type.
    #[error("'{include}' cannot be included on {kind}")]
    UnsupportedInclude { kind: EntityKind, include: Include },

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A single requested object does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// The render configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configured URL could not be parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Writing the document failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] SerdeError),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownKind { name } => ApiError::UnsupportedType(name),
            ModelError::InvalidIdentifier { value, .. } => ApiError::InvalidIdentifier(value),
            ModelError::Snapshot(e) => ApiError::Config(e.to_string()),
        }
    }
}

impl ApiError {
    /// Returns the numeric error code carried in error documents.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::UnsupportedType(_)
            | ApiError::InvalidFormat(_)
            | ApiError::InvalidInclude(_)
            | ApiError::UnsupportedInclude { .. }
            | ApiError::InvalidIdentifier(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Config(_) | ApiError::Url(_) | ApiError::Serialization(_) => 500,
        }
    }

    /// Renders this error as an error document in `format`.
    pub fn to_document(
        &self,
        assembler: &DocumentAssembler<'_>,
        action: &str,
        format: Format,
    ) -> String {
        assembler.error(self.code(), &self.to_string(), action, format)
    }
}

/// Result type alias for rendering operations.
pub type ApiResult<T> = Result<T, ApiError>;
