//! Error types for primitive construction.

use thiserror::Error;

use crate::mesh::VertexSemantic;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PrimitiveError>;

/// Errors raised while generating, encoding, or assembling primitives.
///
/// All of them signal invalid usage: the operations are deterministic, so
/// retrying with the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Degenerate parameters or data (zero grid lines, empty vertex set,
    /// out-of-range accessor, duplicate attribute name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An attribute array's length is not a multiple of its tuple arity.
    #[error("attribute array `{name}` has {len} components, not a multiple of {arity}")]
    MalformedAttributeArray {
        /// Name of the offending array.
        name: String,
        /// Number of scalars in the array.
        len: usize,
        /// Declared tuple arity.
        arity: usize,
    },

    /// A primitive was assembled without a required attribute.
    #[error("primitive has no {0} attribute")]
    MissingRequiredAttribute(VertexSemantic),

    /// A value of the wrong type was handed to a type-erased entry point.
    #[error("type mismatch: expected a {expected} instance")]
    TypeMismatch {
        /// Name of the expected type.
        expected: &'static str,
    },
}

impl PrimitiveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
