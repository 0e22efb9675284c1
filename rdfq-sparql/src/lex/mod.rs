//! SPARQL lexical analysis.
//!
//! Produces a stream of tokens with source spans for the expression and
//! query parsers. Beyond standard SPARQL tokens the lexer recognises
//! `${...}` placeholders so parameterized query text can be scanned
//! without first substituting it.
//!
//! ```
//! use rdfq_sparql::lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("SELECT ?x {}").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::KwSelect);
//! ```

pub mod chars;
mod lexer;
mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{keyword_from_str, Token, TokenKind};
