//! Clause stack frames

use rdfq_graph_ir::Term;

/// Kind of clause a context brackets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clause {
    /// Unbracketed triple block
    #[default]
    Block,
    /// `OPTIONAL { }`
    Optional,
    /// `{ }`, one alternative of a union
    Group,
}

/// An open clause on the compiler's stack
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub clause: Clause,
    /// Subject the block is scoped to; the outermost block has none
    pub subject: Option<Term>,
    /// Groups opened directly inside this context are union alternatives
    pub union: bool,
}

impl Context {
    pub fn new(clause: Clause, subject: Option<Term>, union: bool) -> Self {
        Self {
            clause,
            subject,
            union,
        }
    }

    pub fn has_subject(&self) -> bool {
        self.subject.is_some()
    }

    pub fn is_optional(&self) -> bool {
        self.clause == Clause::Optional
    }

    pub fn is_group(&self) -> bool {
        self.clause == Clause::Group
    }

    pub fn is_block(&self) -> bool {
        self.clause == Clause::Block
    }
}
