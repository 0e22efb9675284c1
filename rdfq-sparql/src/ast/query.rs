//! Query structure: prologue, projection, solution modifiers and the
//! trailing bindings table.

use super::expr::Expression;
use rdfq_graph_ir::Term;
use std::sync::Arc;

/// `BASE` and `PREFIX` declarations, in source order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prologue {
    pub base: Option<Arc<str>>,
    pub prefixes: Vec<(Arc<str>, Arc<str>)>,
}

impl Prologue {
    /// Namespace IRI for a prefix; a later declaration wins
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .rev()
            .find(|(p, _)| p.as_ref() == prefix)
            .map(|(_, iri)| iri.as_ref())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectModifier {
    Distinct,
    Reduced,
}

/// One projected column
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionItem {
    Var(Arc<str>),
    Expr { expr: Expression, alias: Arc<str> },
}

impl ProjectionItem {
    /// The column name
    pub fn name(&self) -> &Arc<str> {
        match self {
            ProjectionItem::Var(name) => name,
            ProjectionItem::Expr { alias, .. } => alias,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    Star,
    Items(Vec<ProjectionItem>),
}

/// Inline data from a `VALUES` or `BINDINGS` block
///
/// `None` marks an `UNDEF` cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValuesBlock {
    pub vars: Vec<Arc<str>>,
    pub rows: Vec<Vec<Option<Term>>>,
}

/// A `SELECT` query over the empty group pattern
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub prologue: Prologue,
    pub modifier: Option<SelectModifier>,
    pub projection: Projection,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub values: Option<ValuesBlock>,
}
