//! SPARQL parser.
//!
//! Parses tokenized query text into the typed AST. Prefixed names and
//! relative IRIs are expanded against the prologue while parsing, so the
//! AST only ever holds absolute IRIs.
//!
//! ```
//! use rdfq_sparql::parse::parse_query;
//!
//! let query = parse_query("SELECT (1 + 1 AS ?_value) {} LIMIT 1").unwrap();
//! assert_eq!(query.limit, Some(1));
//! ```

pub mod expr;
mod query;
mod stream;

pub use expr::parse_expression;
pub use query::{parse_prologue, parse_query, parse_values_block};
pub use stream::TokenStream;
