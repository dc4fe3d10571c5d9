//! Type construction errors

use thiserror::Error;

/// Errors raised when a type descriptor is malformed
///
/// Construction is the only fallible step of the algebra; joins and usage
/// queries are total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Decimal precision/scale out of range
    #[error("Invalid type definition: DECIMAL({precision}, {scale}) needs precision >= 1 and scale <= precision")]
    InvalidDecimal { precision: u32, scale: u32 },

    /// A metadata binding does not belong to the binding above it
    #[error("Invalid type definition: {binding} does not belong to {parent}")]
    InconsistentBinding { binding: String, parent: String },

    /// Tuples need at least one element
    #[error("Invalid type definition: a tuple needs at least one element")]
    EmptyTuple,

    /// A composite was given an element of a kind it cannot hold
    #[error("Invalid type definition: {element} cannot be an element of a {composite}")]
    InvalidElement {
        element: String,
        composite: &'static str,
    },
}

/// Result type for type construction
pub type TypeResult<T> = Result<T, TypeError>;
