//! Template and query events
//!
//! One closed event type serves both sides of the compiler: the structural
//! events produced by a template parser, and the clause events the compiler
//! emits for the query writer.

use crate::{Node, Term};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opening or closing half of a bracketed clause
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Open,
    Close,
}

impl Bracket {
    pub fn is_open(self) -> bool {
        self == Bracket::Open
    }
}

/// A statement read from the template, each end carrying its origin
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
    /// The statement was written against the object (`rev` attribute)
    #[serde(default)]
    pub inverse: bool,
}

impl Triple {
    pub fn new(subject: Node, predicate: Node, object: Node, inverse: bool) -> Self {
        Self {
            subject,
            predicate,
            object,
            inverse,
        }
    }

    /// The end the statement is written about
    pub fn about(&self) -> &Node {
        if self.inverse {
            &self.object
        } else {
            &self.subject
        }
    }

    /// The end opposite [`about`](Self::about)
    pub fn partner(&self) -> &Node {
        if self.inverse {
            &self.subject
        } else {
            &self.object
        }
    }
}

/// A resolved pattern as it appears in the query
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    #[serde(default)]
    pub inverse: bool,
}

impl TriplePattern {
    pub fn new(subject: Term, predicate: Term, object: Term, inverse: bool) -> Self {
        Self {
            subject,
            predicate,
            object,
            inverse,
        }
    }

    pub fn about(&self) -> &Term {
        if self.inverse {
            &self.object
        } else {
            &self.subject
        }
    }

    pub fn partner(&self) -> &Term {
        if self.inverse {
            &self.subject
        } else {
            &self.object
        }
    }
}

/// Structural and clause events
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    StartDocument,
    EndDocument,
    /// Base IRI declaration
    Base(Arc<str>),
    /// Namespace prefix declaration
    Namespace {
        prefix: Arc<str>,
        iri: Arc<str>,
    },
    StartSubject(Node),
    EndSubject(Node),
    StartGraph(Term),
    EndGraph(Term),
    Triple(Triple),
    TriplePattern(TriplePattern),
    /// Comment text, without the leading `#`
    Comment(Arc<str>),

    Select,
    Ask,
    Where(Bracket),
    Optional(Bracket),
    Group(Bracket),
    Union,
    /// `ORDER BY` over variable names
    OrderBy(Vec<Arc<str>>),
}

impl Event {
    /// Document, subject or graph start
    pub fn is_start(&self) -> bool {
        matches!(
            self,
            Event::StartDocument | Event::StartSubject(_) | Event::StartGraph(_)
        )
    }

    /// Document, subject or graph end
    pub fn is_end(&self) -> bool {
        matches!(
            self,
            Event::EndDocument | Event::EndSubject(_) | Event::EndGraph(_)
        )
    }

    /// Create a base declaration
    pub fn base(iri: impl AsRef<str>) -> Self {
        Event::Base(Arc::from(iri.as_ref()))
    }

    /// Create a namespace declaration
    pub fn namespace(prefix: impl AsRef<str>, iri: impl AsRef<str>) -> Self {
        Event::Namespace {
            prefix: Arc::from(prefix.as_ref()),
            iri: Arc::from(iri.as_ref()),
        }
    }

    /// Create a comment
    pub fn comment(text: impl AsRef<str>) -> Self {
        Event::Comment(Arc::from(text.as_ref()))
    }
}
