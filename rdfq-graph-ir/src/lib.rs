//! Term and event model for the rdfq template compiler
//!
//! This crate provides the types shared by the compiler stages: terms as they
//! appear in annotated templates, the structural events a template parser
//! produces, and the clause events the compiler emits.
//!
//! # Key Design Principles
//!
//! 1. **Closed sum types** - `Term` and `Event` are plain enums; every stage
//!    matches on them exhaustively.
//!
//! 2. **References keep their written form** - a `Term::Reference` carries
//!    both the relative IRI from the template and its resolution, so
//!    template variables like `?name` stay recognisable.
//!
//! 3. **Lazy look-ahead** - `EventBuffer` reads ahead only as far as a
//!    caller peeks.
//!
//! # Example
//!
//! ```
//! use rdfq_graph_ir::{Event, EventBuffer, Node, Term};
//!
//! let events = vec![
//!     Event::StartDocument,
//!     Event::StartSubject(Node::new(Term::reference("http://example.org/", "?this"))),
//! ];
//! let mut reader = EventBuffer::new(events.into_iter());
//! assert!(matches!(reader.peek(1), Some(Event::StartSubject(_))));
//! assert_eq!(reader.next(), Some(Event::StartDocument));
//! ```

pub mod datatype;
mod event;
pub mod iri;
mod override_base;
mod reader;
mod term;

pub use datatype::Datatype;
pub use event::{Bracket, Event, Triple, TriplePattern};
pub use override_base::OverrideBase;
pub use reader::EventBuffer;
pub use term::{BlankId, LiteralTag, Node, Term};
