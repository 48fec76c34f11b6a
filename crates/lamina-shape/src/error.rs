//! Error types for lamina-shape.

use thiserror::Error;

/// Errors produced by shape construction and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// The four corners of a quadrilateral cross each other.
    #[error("degenerate quadrilateral: opposite edges cross")]
    DegenerateQuad,

    /// Unknown segment kind character in a serialized shape.
    #[error("unknown segment kind {0:?}")]
    UnknownKind(char),

    /// A numeric component failed to parse.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Input ended before a segment's components were complete.
    #[error("unexpected end of shape data")]
    UnexpectedEnd,

    /// Serialized form is missing the `Shape[` ... `]` wrapper.
    #[error("malformed shape string: {0}")]
    Malformed(&'static str),
}
