//! Token stream for parsing.
//!
//! The `TokenStream` wraps the lexer output and provides lookahead,
//! matching and consuming helpers. It also carries the prologue read so
//! far, so that prefixed names can be expanded where they are parsed.

use crate::ast::Prologue;
use crate::error::{QueryError, Result};
use crate::lex::{Token, TokenKind};
use rdfq_graph_ir::iri;
use std::sync::Arc;

/// A stream of tokens for parsing.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    prologue: Prologue,
}

impl TokenStream {
    /// Create a new token stream from a vector of tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, end, end),
            prologue: Prologue::default(),
        }
    }

    /// Create a token stream that starts with declarations already in scope.
    pub fn with_prologue(tokens: Vec<Token>, prologue: Prologue) -> Self {
        Self {
            prologue,
            ..Self::new(tokens)
        }
    }

    /// Check if at end of stream (only EOF remains).
    pub fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token {
        self.peek_n(0)
    }

    /// Peek at the nth token ahead (0 = current).
    pub fn peek_n(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    /// Byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.peek().span.start
    }

    /// Consume the current token and return it (owned).
    pub fn consume(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token has the same kind as `kind`, ignoring payload.
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    /// Consume the current token if it matches, returning true.
    pub fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.consume();
            true
        } else {
            false
        }
    }

    /// Expect and consume a specific token kind.
    pub fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.consume())
        } else {
            Err(self.error(format!("expected {}, found {}", what, self.peek().kind)))
        }
    }

    /// Expect a variable and return its name.
    pub fn expect_var(&mut self) -> Result<Arc<str>> {
        match self.peek().kind.clone() {
            TokenKind::Var(name) => {
                self.consume();
                Ok(name)
            }
            other => Err(self.error(format!("expected variable, found {}", other))),
        }
    }

    /// Parse error at the current token.
    pub fn error(&self, message: impl Into<String>) -> QueryError {
        QueryError::parse(self.offset(), message)
    }

    pub fn prologue(&self) -> &Prologue {
        &self.prologue
    }

    pub fn set_base(&mut self, base: Arc<str>) {
        let resolved = self.resolve_iri(&base);
        self.prologue.base = Some(Arc::from(resolved));
    }

    pub fn add_prefix(&mut self, prefix: Arc<str>, namespace: &str) {
        let resolved = self.resolve_iri(namespace);
        self.prologue.prefixes.push((prefix, Arc::from(resolved)));
    }

    pub fn take_prologue(&mut self) -> Prologue {
        std::mem::take(&mut self.prologue)
    }

    /// Resolve an IRI reference against the declared base, if any.
    pub fn resolve_iri(&self, reference: &str) -> String {
        match &self.prologue.base {
            Some(base) if !iri::is_absolute(reference) => iri::resolve(base, reference),
            _ => reference.to_string(),
        }
    }

    /// Expand `prefix:local` using the declared prefixes.
    pub fn expand_prefixed(&self, prefix: &str, local: &str) -> Result<String> {
        match self.prologue.namespace(prefix) {
            Some(ns) => Ok(format!("{}{}", ns, local)),
            None => Err(QueryError::UndefinedPrefix(prefix.to_string())),
        }
    }
}
