//! Term resolution
//!
//! Maps a template term to the term written into the query. Template
//! variables (`?name` references and `?name` literals) become variables,
//! blank nodes and empty literals become synthesized variables named after
//! the predicate they hang off, everything else passes through.

use crate::error::{CompileError, Result};
use crate::origins::OriginTable;
use crate::registry::VariableRegistry;
use rdfq_graph_ir::{iri, Node, Term, Triple};
use rdfq_sparql::lex::chars::{is_var_name, is_varname_char};
use std::sync::Arc;

/// The reference that stands for the page's own resource
const SELF_REFERENCE: &str = "?this";

/// Per-compilation naming state
#[derive(Debug, Default)]
pub struct TermResolver {
    registry: VariableRegistry,
    origins: OriginTable,
}

impl TermResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Origins recorded so far, in capture order
    pub fn origins(&self) -> &OriginTable {
        &self.origins
    }

    /// Resolve one end of `triple` (or a lone subject when `triple` is `None`).
    ///
    /// With `record_origin` set, the origin of every variable this produces
    /// is captured.
    pub fn resolve(
        &mut self,
        node: &Node,
        triple: Option<&Triple>,
        record_origin: bool,
    ) -> Result<Term> {
        let label = triple.map(|t| self.compound_label(node, t));

        match &node.term {
            Term::Var(_) => Ok(node.term.clone()),

            Term::Literal { lexical, .. } if lexical.trim().is_empty() => {
                let name = match &label {
                    Some(label) => format!("_{}", self.registry.next_name(label)),
                    None => "_".to_string(),
                };
                if label.is_some() && record_origin {
                    self.record(&name, node);
                }
                variable(name)
            }

            Term::Literal { lexical, .. } => match lexical.strip_prefix('?') {
                Some(pinned) => {
                    if record_origin {
                        self.record(pinned, node);
                    }
                    variable(pinned)
                }
                None => Ok(node.term.clone()),
            },

            Term::Blank(_) => {
                let key = node.term.string_value();
                let assigned = self.registry.name_for(&key, label.as_deref());
                let name = format!("_{}", assigned.as_deref().unwrap_or(""));
                if label.is_some() && record_origin {
                    self.record(&name, node);
                }
                variable(name)
            }

            Term::Iri(_) | Term::Curie { .. } => Ok(node.term.clone()),

            Term::Reference { relative, .. } => match template_variable(relative) {
                Some(name) => {
                    if label.is_some() && record_origin {
                        self.record(name, node);
                    }
                    variable(name)
                }
                None => Ok(node.term.clone()),
            },
        }
    }

    /// A triple is optional when its partner resolves to a variable
    pub fn is_optional(&mut self, triple: &Triple) -> Result<bool> {
        Ok(self.resolve(triple.partner(), None, false)?.is_var())
    }

    /// Whether a literal triple was already processed out of line
    pub fn is_promoted(&self, triple: &Triple) -> bool {
        triple.object.term.is_literal()
            && triple
                .object
                .origin
                .as_deref()
                .is_some_and(|origin| self.origins.contains_origin(origin))
    }

    /// Predicate label, qualified by the variable at the other end
    fn compound_label(&self, node: &Node, triple: &Triple) -> String {
        let label = predicate_label(&triple.predicate.term, triple.inverse);
        let opposite = if node.term == triple.subject.term {
            &triple.object.term
        } else {
            &triple.subject.term
        };

        match opposite {
            Term::Iri(_) | Term::Curie { .. } => label,
            Term::Reference { relative, .. } => match template_variable(relative) {
                Some(name) => format!("{}_{}", name, label),
                None => label,
            },
            other => {
                let registered = self.registry.lookup(&other.string_value()).unwrap_or("");
                format!("{}_{}", registered, label)
            }
        }
    }

    fn record(&mut self, name: &str, node: &Node) {
        if let Some(origin) = &node.origin {
            self.origins.insert(name, origin.as_ref());
        }
    }
}

/// `?name` in a reference, other than the self reference
fn template_variable(relative: &str) -> Option<&str> {
    if relative == SELF_REFERENCE {
        return None;
    }
    relative.strip_prefix('?')
}

fn variable(name: impl AsRef<str>) -> Result<Term> {
    let name = name.as_ref();
    if !is_var_name(name) {
        return Err(CompileError::GrammarViolation {
            name: name.to_string(),
        });
    }
    Ok(Term::Var(Arc::from(name)))
}

/// Variable label for a predicate.
///
/// Takes the local name, drops a `has`/`in` prefix before an upper-case
/// letter, maps characters a variable name cannot hold to `_`, and marks
/// inverse traversal with `Of` (removing one that is already there).
pub fn predicate_label(predicate: &Term, inverse: bool) -> String {
    let full = predicate.as_iri().map_or_else(|| predicate.string_value(), String::from);
    let local = iri::local_name(&full);
    let local = strip_prefix(&strip_prefix(local, "has"), "in");

    let mut label: String = local
        .chars()
        .map(|c| if is_varname_char(c) { c } else { '_' })
        .collect();

    if inverse {
        if label.len() > 2 && label.ends_with("Of") {
            label.truncate(label.len() - 2);
        } else {
            label.push_str("Of");
        }
    }
    label
}

/// `hasName` → `name`; `hash` is left alone
fn strip_prefix(label: &str, prefix: &str) -> String {
    if let Some(rest) = label.strip_prefix(prefix) {
        let mut chars = rest.chars();
        if let Some(first) = chars.next() {
            if first.to_uppercase().eq(std::iter::once(first)) {
                return first.to_lowercase().chain(chars).collect();
            }
        }
    }
    label.to_string()
}
