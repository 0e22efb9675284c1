//! Template-to-query compiler
//!
//! Compiles the structural events of an annotated page template into a
//! SPARQL query that retrieves everything the template can display, and
//! prepares such queries for execution.
//!
//! The first stage is [`SparqlProducer`]: fixed properties of a subject are
//! joined, variable ones become alternatives of an `OPTIONAL`/`UNION`
//! structure, and every synthesized variable is recorded with the template
//! location it came from. [`write_query`] renders the result.
//!
//! The second stage is [`ParameterizedQuery`], which evaluates inline
//! `${expr}` expressions and appends the runtime parameter table.
//!
//! # Example
//!
//! ```
//! use rdfq_graph_ir::{Event, Node, Term, Triple};
//! use rdfq_template::{compile_to_string, CompilerConfig};
//!
//! let this = Node::with_origin(Term::reference("http://example.org/", "?this"), "/1");
//! let name = Node::with_origin(Term::plain(""), "/1/1");
//! let predicate = Node::new(Term::curie("foaf", "name", "http://xmlns.com/foaf/0.1/"));
//! let events = vec![
//!     Event::StartDocument,
//!     Event::StartSubject(this.clone()),
//!     Event::Triple(Triple::new(this.clone(), predicate, name, false)),
//!     Event::EndSubject(this),
//!     Event::EndDocument,
//! ];
//!
//! let query = compile_to_string(events, CompilerConfig::default()).unwrap();
//! assert!(query.contains("<?this> foaf:name ?_name ."));
//! assert!(query.ends_with("# @origin _name /1/1\n"));
//! ```

mod context;
pub mod error;
mod origins;
mod parameterized;
mod producer;
mod registry;
mod resolver;
mod writer;

pub use error::{CompileError, PrepareError, PrepareResult, Result};
pub use origins::{origins_from_query, OriginTable};
pub use parameterized::ParameterizedQuery;
pub use producer::{compile, CompilerConfig, QueryShape, SparqlProducer};
pub use resolver::{predicate_label, TermResolver};
pub use writer::{compile_to_string, write_query};
