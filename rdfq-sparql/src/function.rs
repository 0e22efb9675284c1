//! Function evaluation module
//!
//! Evaluates SPARQL expressions against a single solution. Function
//! implementations are organized by category, next to the core expression
//! evaluation logic.
//!
//! # Module Structure
//!
//! - `value`: ComparableValue type and canonical lexical forms
//! - `compare`: Value comparison logic
//! - `helpers`: Shared utilities (regex flags, arity checks, string arguments)
//! - `eval`: Core expression evaluation
//! - `dispatch`: Main function dispatcher
//! - `cast`: XSD constructor casts
//! - Category submodules: `string`, `numeric`, `datetime`, `hash`, `uuid`,
//!   `types`, `rdf`, `conditional`

mod cast;
mod compare;
mod conditional;
mod datetime;
mod dispatch;
mod eval;
mod hash;
mod helpers;
mod numeric;
mod rdf;
mod string;
mod types;
mod uuid;
mod value;

// Re-export public API
pub use datetime::XsdDateTime;
pub use eval::{evaluate, EvalContext};
pub use value::{canonical_decimal, canonical_double, ComparableValue};
