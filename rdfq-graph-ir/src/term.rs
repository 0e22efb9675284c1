//! Template terms: variables, IRIs, references, blank nodes and literals
//!
//! A term is exactly one of the [`Term`] variants. IRI-valued terms come in
//! three shapes (absolute, compact and relative-as-written) that compare
//! equal when they expand to the same absolute IRI.

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node identifier
///
/// The label never includes the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without `_:`)
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// What follows the lexical form of a literal
///
/// Language tag and datatype are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralTag {
    /// Plain literal, no suffix
    Simple,
    /// `"..."@lang`
    Lang(Arc<str>),
    /// `"..."^^<datatype>`
    Typed(Datatype),
}

/// A variable, IRI, reference, blank node or literal
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Query variable, name without the `?` marker
    Var(Arc<str>),

    /// Absolute IRI
    Iri(Arc<str>),

    /// Compact IRI `prefix:local`, with its expansion
    Curie {
        prefix: Arc<str>,
        local: Arc<str>,
        iri: Arc<str>,
    },

    /// IRI as written in the template, plus its resolution against the base
    Reference {
        relative: Arc<str>,
        resolved: Arc<str>,
    },

    /// Blank node
    Blank(BlankId),

    /// Literal with lexical form and tag
    Literal { lexical: Arc<str>, tag: LiteralTag },
}

impl Term {
    /// Create a variable term
    pub fn var(name: impl AsRef<str>) -> Self {
        Term::Var(Arc::from(name.as_ref()))
    }

    /// Create an absolute IRI term
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a compact IRI from its prefix, local part and namespace
    pub fn curie(prefix: impl AsRef<str>, local: impl AsRef<str>, namespace: &str) -> Self {
        let local = local.as_ref();
        Term::Curie {
            prefix: Arc::from(prefix.as_ref()),
            local: Arc::from(local),
            iri: Arc::from(format!("{namespace}{local}")),
        }
    }

    /// Create a reference by resolving `relative` against `base`
    pub fn reference(base: &str, relative: impl AsRef<str>) -> Self {
        let relative = relative.as_ref();
        Term::Reference {
            resolved: Arc::from(crate::iri::resolve(base, relative)),
            relative: Arc::from(relative),
        }
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(BlankId::new(label))
    }

    /// Create a plain literal
    pub fn plain(lexical: impl AsRef<str>) -> Self {
        Term::Literal {
            lexical: Arc::from(lexical.as_ref()),
            tag: LiteralTag::Simple,
        }
    }

    /// Create a language-tagged literal
    pub fn lang_string(lexical: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            lexical: Arc::from(lexical.as_ref()),
            tag: LiteralTag::Lang(Arc::from(lang.as_ref())),
        }
    }

    /// Create a typed literal
    pub fn typed(lexical: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::Literal {
            lexical: Arc::from(lexical.as_ref()),
            tag: LiteralTag::Typed(datatype),
        }
    }

    /// Create an xsd:integer literal
    pub fn integer(value: i64) -> Self {
        Term::typed(value.to_string(), Datatype::xsd_integer())
    }

    /// Create an xsd:boolean literal
    pub fn boolean(value: bool) -> Self {
        Term::typed(if value { "true" } else { "false" }, Datatype::xsd_boolean())
    }

    /// Check if this is a variable
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Check if this is IRI-valued (absolute, compact or reference)
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::Curie { .. } | Term::Reference { .. })
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get the variable name
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Term::Var(name) => Some(name),
            _ => None,
        }
    }

    /// The absolute IRI of an IRI-valued term
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) | Term::Curie { iri, .. } => Some(iri),
            Term::Reference { resolved, .. } => Some(resolved),
            _ => None,
        }
    }

    /// Try to get literal components
    pub fn as_literal(&self) -> Option<(&str, &LiteralTag)> {
        match self {
            Term::Literal { lexical, tag } => Some((lexical, tag)),
            _ => None,
        }
    }

    /// String used to key the term in lookup tables
    ///
    /// Variables yield their name, IRI-valued terms their absolute IRI,
    /// blank nodes `_:label` and literals their lexical form.
    pub fn string_value(&self) -> String {
        match self {
            Term::Var(name) => name.to_string(),
            Term::Iri(iri) | Term::Curie { iri, .. } => iri.to_string(),
            Term::Reference { resolved, .. } => resolved.to_string(),
            Term::Blank(id) => id.to_string(),
            Term::Literal { lexical, .. } => lexical.to_string(),
        }
    }

    /// Re-resolve a reference against another base, keeping its relative form
    pub fn rebase(&self, base: &str) -> Term {
        match self {
            Term::Reference { relative, .. } => Term::reference(base, relative.as_ref()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Blank(a), Term::Blank(b)) => a == b,
            (
                Term::Literal {
                    lexical: l1,
                    tag: t1,
                },
                Term::Literal {
                    lexical: l2,
                    tag: t2,
                },
            ) => l1 == l2 && t1 == t2,
            (a, b) => match (a.as_iri(), b.as_iri()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Term::Var(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Term::Blank(id) => {
                1u8.hash(state);
                id.hash(state);
            }
            Term::Literal { lexical, tag } => {
                2u8.hash(state);
                lexical.hash(state);
                tag.hash(state);
            }
            Term::Iri(_) | Term::Curie { .. } | Term::Reference { .. } => {
                3u8.hash(state);
                self.as_iri().hash(state);
            }
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Var(name) => write!(f, "?{name}"),
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Curie { prefix, local, .. } => write!(f, "{prefix}:{local}"),
            Term::Reference { relative, .. } => write!(f, "<{relative}>"),
            Term::Blank(id) => write!(f, "{id}"),
            Term::Literal { lexical, tag } => {
                write!(f, "\"{lexical}\"")?;
                match tag {
                    LiteralTag::Simple => Ok(()),
                    LiteralTag::Lang(lang) => write!(f, "@{lang}"),
                    LiteralTag::Typed(dt) => write!(f, "^^<{dt}>"),
                }
            }
        }
    }
}

/// A term with the template location it came from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub term: Term,
    /// Space-separated provenance paths; the first one is the primary path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Arc<str>>,
}

impl Node {
    /// Wrap a term with no origin
    pub fn new(term: Term) -> Self {
        Self { term, origin: None }
    }

    /// Wrap a term with an origin
    pub fn with_origin(term: Term, origin: impl AsRef<str>) -> Self {
        Self {
            term,
            origin: Some(Arc::from(origin.as_ref())),
        }
    }

    /// The first path of the origin, if any
    pub fn primary_origin(&self) -> Option<&str> {
        self.origin
            .as_deref()
            .and_then(|origin| origin.split(' ').next())
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Node::new(term)
    }
}

/// Node equality is term equality; origins are provenance only.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_iri_shapes_compare_by_expansion() {
        let iri = Term::iri("http://example.org/vocab#name");
        let curie = Term::curie("ex", "name", "http://example.org/vocab#");
        let reference = Term::reference("http://example.org/vocab", "#name");

        assert_eq!(iri, curie);
        assert_eq!(iri, reference);
        assert_ne!(iri, Term::plain("http://example.org/vocab#name"));
    }

    #[test]
    fn test_literal_tags_are_distinct() {
        let plain = Term::plain("chat");
        let french = Term::lang_string("chat", "fr");
        let typed = Term::typed("chat", Datatype::xsd_string());
        assert_ne!(plain, french);
        assert_ne!(plain, typed);
        assert_ne!(french, typed);
    }

    #[test]
    fn test_string_value() {
        assert_eq!(Term::var("x").string_value(), "x");
        assert_eq!(Term::blank("b1").string_value(), "_:b1");
        assert_eq!(Term::plain("hi").string_value(), "hi");
        assert_eq!(
            Term::reference("http://example.org/a/", "b").string_value(),
            "http://example.org/a/b"
        );
    }

    #[test]
    fn test_rebase_keeps_relative_form() {
        let term = Term::reference("http://old.example/dir/", "page");
        let rebased = term.rebase("http://new.example/other/");
        match rebased {
            Term::Reference { relative, resolved } => {
                assert_eq!(relative.as_ref(), "page");
                assert_eq!(resolved.as_ref(), "http://new.example/other/page");
            }
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn test_term_display() {
        assert_eq!(format!("{}", Term::var("name")), "?name");
        assert_eq!(format!("{}", Term::iri("http://example.org")), "<http://example.org>");
        assert_eq!(format!("{}", Term::lang_string("bonjour", "fr")), "\"bonjour\"@fr");
        assert_eq!(
            format!("{}", Term::integer(42)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_node_primary_origin() {
        let node = Node::with_origin(Term::plain(""), "/1/2/3 /1/4");
        assert_eq!(node.primary_origin(), Some("/1/2/3"));
        assert_eq!(Node::new(Term::plain("")).primary_origin(), None);
        assert_eq!(node, Node::new(Term::plain("")));
    }
}
