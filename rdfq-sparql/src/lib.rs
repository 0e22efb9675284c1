//! # rdfq SPARQL reader
//!
//! The SPARQL subset the template compiler writes and reads back:
//! - Term serialization and value parsing (`codec`)
//! - A `winnow` lexer and recursive-descent parser for `SELECT` queries over
//!   the empty group pattern, with a trailing `BINDINGS`/`VALUES` table
//! - An inline expression evaluator covering the SPARQL 1.1 builtins
//!
//! ## Quick Start
//!
//! ```
//! use rdfq_graph_ir::Term;
//!
//! let text = "SELECT (CONCAT(?a, \"!\") AS ?_value) {} LIMIT 1\nBINDINGS $a {\n\t(\"hi\" )\n}\n";
//! let results = rdfq_sparql::evaluate_query(text).unwrap();
//! assert_eq!(results.first("_value"), Some(&Term::plain("hi!")));
//! ```

pub mod ast;
pub mod codec;
pub mod error;
pub mod exec;
pub mod function;
pub mod lex;
pub mod parse;
pub mod span;

pub use codec::{parse_value, write_value};
pub use error::{EvalError, QueryError, Result};
pub use exec::{execute, QueryResults, Solution};
pub use parse::parse_query;

/// Parse and execute a query against the empty dataset
pub fn evaluate_query(text: &str) -> Result<QueryResults> {
    let query = parse_query(text)?;
    Ok(execute(&query))
}
