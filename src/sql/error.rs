//! Errors raised while building or rendering expressions.

use thiserror::Error;

use super::dialect::Dialect;

pub type Result<T> = std::result::Result<T, SqlError>;

/// Failure modes of expression construction and rendering.
///
/// None of these are recoverable inside the engine. A render call that
/// returns an error has produced no usable SQL.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SqlError {
    /// Malformed tree: missing required child, bad arity, conflicting windows.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// No native support and no emulation rule for this dialect.
    #[error("{construct} is not supported by {dialect} and cannot be emulated")]
    UnsupportedConstruct { construct: String, dialect: Dialect },

    /// Tree depth exceeded the configured render limit.
    #[error("Expression nesting exceeds render limit of {limit}")]
    RenderingOverflow { limit: usize },
}

pub(crate) fn invalid(msg: impl Into<String>) -> SqlError {
    SqlError::InvalidExpression(msg.into())
}

pub(crate) fn unsupported(construct: impl Into<String>, dialect: Dialect) -> SqlError {
    SqlError::UnsupportedConstruct {
        construct: construct.into(),
        dialect,
    }
}
