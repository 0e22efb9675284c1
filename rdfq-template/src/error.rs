//! Error types for template compilation and query preparation

use rdfq_sparql::QueryError;
use thiserror::Error;

/// Errors that abort a compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A synthesized or pinned variable name is not a valid SPARQL variable name
    #[error("invalid variable name: {name}")]
    GrammarViolation { name: String },
}

/// Result type for compilation
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while preparing a parameterized query
#[derive(Debug, Error)]
pub enum PrepareError {
    /// An inline `${}` expression produced no row or an unbound value
    #[error("No value for expression: {expression}")]
    MissingExpressionValue { expression: String },

    /// A runtime parameter string could not be read as a term
    #[error("Invalid parameter value: {value}")]
    UnparseableParameterValue { value: String },

    /// Query text that could not be read
    #[error(transparent)]
    Expression(#[from] QueryError),
}

/// Result type for preparation
pub type PrepareResult<T> = std::result::Result<T, PrepareError>;
