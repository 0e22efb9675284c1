//! Abstract syntax for the query subset the inline evaluator runs.
//!
//! Constants are represented directly as [`Term`](rdfq_graph_ir::Term)s
//! with prefixed names already expanded by the parser.

pub mod expr;
pub mod query;

pub use expr::{BinaryOp, Expression, FunctionName, UnaryOp};
pub use query::{Projection, ProjectionItem, Prologue, Query, SelectModifier, ValuesBlock};
