//! Error types for the floorplan crate.

use thiserror::Error;

use crate::doc::FloorId;

/// Errors raised by document loading and document-level mutations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is missing a required field or the field is empty.
    #[error("invalid building data: {0}")]
    Validation(String),

    /// The mutation would break a document invariant; nothing was changed.
    #[error("{0}")]
    InvariantViolation(String),

    /// The referenced floor does not exist.
    #[error("floor not found: {0}")]
    UnknownFloor(FloorId),

    /// The document is not well-formed JSON for the schema.
    #[error("malformed building JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while turning a stored object into a drawable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The icon identifier is not in the catalog.
    #[error("unknown icon: {0}")]
    UnknownIcon(String),

    /// The glyph markup could not be turned into drawable parts.
    #[error("unparseable glyph for {icon}: {reason}")]
    Glyph { icon: String, reason: String },
}
