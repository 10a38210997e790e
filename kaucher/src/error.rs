use crate::ast::{NodeId, Span};
use thiserror::Error;

/// Error types for bound estimation
///
/// Numerically undefined results (log of a negative range, division by an
/// interval straddling zero, ...) are not errors: they surface as NaN bounds
/// on the computed interval. Only structural problems end up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundError {
    /// A node's symbol is outside the set the modal interpreter supports
    #[error("Unsupported symbol '{symbol}' at {node}")]
    UnsupportedSymbol { symbol: String, node: NodeId },

    /// `pow` was asked for a non-integer exponent
    #[error("Unsupported exponent {exponent}: only integer exponents are supported")]
    UnsupportedExponent { exponent: String },

    /// A variable referenced by the tree has no range
    #[error("No range given for variable '{variable}'")]
    MissingRange { variable: String },

    /// Plain intervals must satisfy lower <= upper
    #[error("Invalid interval [{lower} .. {upper}]: lower bound exceeds upper bound")]
    InvalidInterval { lower: f64, upper: f64 },

    /// A node has the wrong number of children for its symbol
    #[error("Malformed tree at {node}: {message}")]
    MalformedTree { node: NodeId, message: String },

    /// Parse error with source location
    #[error("Parse error: {message} at {}:{}", .span.line, .span.col)]
    Parse { message: String, span: Span },

    /// Resource limit exceeded
    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value}). {suggestion}")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },
}

impl BoundError {
    /// Create a parse error at the given location
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::Parse {
            message: message.into(),
            span,
        }
    }

    pub fn malformed(node: NodeId, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            node,
            message: message.into(),
        }
    }

    pub fn missing_range(variable: impl Into<String>) -> Self {
        Self::MissingRange {
            variable: variable.into(),
        }
    }
}
