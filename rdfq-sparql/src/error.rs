//! Error types for reading and evaluating SPARQL text

use thiserror::Error;

/// Errors raised while reading a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid token in the query text
    #[error("lexer error at byte {position}: {message}")]
    Lexer { position: usize, message: String },

    /// Unexpected token or unsupported construct
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// Prefixed name whose prefix was never declared
    #[error("undefined prefix '{0}:'")]
    UndefinedPrefix(String),
}

impl QueryError {
    /// Create a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type for query reading
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while evaluating an expression
///
/// These never abort a query: a projection whose expression fails is left
/// unbound in that solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("variable ?{0} is unbound")]
    Unbound(String),

    #[error("{function} requires {expected}")]
    Arity {
        function: &'static str,
        expected: &'static str,
    },

    #[error("type error: {0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid regular expression: {0}")]
    Regex(String),
}

impl EvalError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }
}

/// Result type for expression evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;
