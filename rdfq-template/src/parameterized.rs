//! Parameterized queries
//!
//! A [`ParameterizedQuery`] is query text plus a table of named parameters.
//! [`prepare`](ParameterizedQuery::prepare) turns it into the text sent to a
//! store: every `${expr}` is replaced by the value of `expr`, evaluated with
//! the parameters bound but no data, and the parameter values are appended
//! as a `BINDINGS` table.

use crate::error::{PrepareError, PrepareResult};
use rdfq_graph_ir::{iri, LiteralTag, Term};
use rdfq_sparql::ast::Prologue;
use rdfq_sparql::lex::{tokenize, Token, TokenKind};
use rdfq_sparql::parse::{parse_prologue, parse_values_block, TokenStream};
use rdfq_sparql::{evaluate_query, parse_value, write_value, QueryError};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Result variable of an inline expression query
const VALUE_VAR: &str = "_value";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"))
}

/// Query text with named, sample-valued parameters
#[derive(Clone, Debug)]
pub struct ParameterizedQuery {
    template: String,
    system_id: String,
    prefixes: Vec<(String, String)>,
    bindings: Vec<(Arc<str>, Option<Term>)>,
}

impl ParameterizedQuery {
    /// Create a query from its parts.
    ///
    /// `bindings` lists the parameter names in `BINDINGS` column order, each
    /// with the sample value used when no runtime value is supplied.
    pub fn new(
        template: impl Into<String>,
        system_id: impl Into<String>,
        prefixes: Vec<(String, String)>,
        bindings: Vec<(Arc<str>, Option<Term>)>,
    ) -> Self {
        Self {
            template: template.into(),
            system_id: system_id.into(),
            prefixes,
            bindings,
        }
    }

    /// Read a query whose trailing `BINDINGS` (or `VALUES`) block declares
    /// the parameters.
    ///
    /// The block's first row supplies the samples. The prologue's prefixes
    /// are kept for inline expressions and parameter parsing.
    pub fn parse(text: &str, system_id: &str) -> Result<Self, QueryError> {
        let tokens = tokenize(text)?;
        let mut prologue = TokenStream::new(tokens.clone());
        parse_prologue(&mut prologue)?;
        let prologue = prologue.take_prologue();
        let prefixes = prologue
            .prefixes
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
            .collect();

        let Some(start) = trailing_block(&tokens) else {
            return Ok(Self::new(text, system_id, prefixes, Vec::new()));
        };

        let offset = tokens[start].span.start;
        let mut stream = TokenStream::with_prologue(tokens[start..].to_vec(), prologue);
        let block = parse_values_block(&mut stream)?.unwrap_or_default();
        if !stream.is_eof() {
            return Err(stream.error(format!("unexpected {} after bindings", stream.peek().kind)));
        }

        let first = block.rows.into_iter().next().unwrap_or_default();
        let bindings: Vec<(Arc<str>, Option<Term>)> = block
            .vars
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, first.get(i).cloned().flatten()))
            .collect();

        debug!(parameters = bindings.len(), "parsed parameterized query");
        Ok(Self::new(
            text[..offset].trim_end(),
            system_id,
            prefixes,
            bindings,
        ))
    }

    /// The query text without the bindings table
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Parameter names, in column order
    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_ref())
    }

    /// Sample value of a parameter
    pub fn sample(&self, name: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .and_then(|(_, sample)| sample.as_ref())
    }

    /// Query text for the given runtime parameter values.
    ///
    /// A parameter with no values keeps its sample; one with several values
    /// contributes one row per value, so the table is the cross product.
    pub fn prepare(&self, parameters: &HashMap<String, Vec<String>>) -> PrepareResult<String> {
        if !self.template.contains("${") && self.bindings.is_empty() {
            return Ok(self.template.clone());
        }

        let _span = tracing::debug_span!("prepare", system_id = %self.system_id).entered();
        let rows = self.binding_rows(parameters)?;
        let text = if self.template.contains("${") {
            self.inline_expressions(&rows)?
        } else {
            self.template.clone()
        };
        Ok(self.append_bindings(text, &rows))
    }

    /// Term for a runtime parameter string, shaped like the parameter's sample
    pub fn resolve_parameter(&self, name: &str, value: &str) -> Option<Term> {
        match self.sample(name) {
            Some(Term::Literal { tag, .. }) => Some(match tag {
                LiteralTag::Simple => Term::plain(value),
                LiteralTag::Lang(lang) => Term::lang_string(value, lang.as_ref()),
                LiteralTag::Typed(datatype) => Term::typed(value, datatype.clone()),
            }),
            Some(sample) if sample.is_iri() => Some(Term::iri(iri::resolve(&self.system_id, value))),
            _ => parse_value(value, &self.prologue()),
        }
    }

    fn prologue(&self) -> Prologue {
        Prologue {
            base: (!self.system_id.is_empty()).then(|| Arc::from(self.system_id.as_str())),
            prefixes: self
                .prefixes
                .iter()
                .map(|(prefix, ns)| (Arc::from(prefix.as_str()), Arc::from(ns.as_str())))
                .collect(),
        }
    }

    fn inline_expressions(&self, rows: &[Vec<Option<Term>>]) -> PrepareResult<String> {
        let mut header = String::new();
        if !self.system_id.is_empty() {
            let _ = writeln!(header, "BASE <{}>", self.system_id);
        }
        for (prefix, ns) in &self.prefixes {
            let _ = writeln!(header, "PREFIX {}:<{}>", prefix, ns);
        }

        let mut out = String::with_capacity(self.template.len());
        let mut last = 0;
        for caps in placeholder_pattern().captures_iter(&self.template) {
            let (Some(whole), Some(expression)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let expression = expression.as_str();
            out.push_str(&self.template[last..whole.start()]);
            out.push_str(&self.evaluate(&header, expression, rows)?);
            last = whole.end();
        }
        out.push_str(&self.template[last..]);
        Ok(out)
    }

    fn evaluate(
        &self,
        header: &str,
        expression: &str,
        rows: &[Vec<Option<Term>>],
    ) -> PrepareResult<String> {
        let select = format!(
            "{}SELECT ({} AS ?{}) {{}} LIMIT 1",
            header, expression, VALUE_VAR
        );
        let query = self.append_bindings(select, rows);
        trace!(%query, "evaluating inline expression");

        let results = evaluate_query(&query)?;
        match results.first(VALUE_VAR) {
            Some(value) => Ok(write_value(value)),
            None => Err(PrepareError::MissingExpressionValue {
                expression: expression.to_string(),
            }),
        }
    }

    fn binding_rows(
        &self,
        parameters: &HashMap<String, Vec<String>>,
    ) -> PrepareResult<Vec<Vec<Option<Term>>>> {
        let mut rows: Vec<Vec<Option<Term>>> = vec![Vec::new()];
        for (name, sample) in &self.bindings {
            let values = match parameters.get(name.as_ref()) {
                Some(strings) if !strings.is_empty() => strings
                    .iter()
                    .map(|string| {
                        self.resolve_parameter(name, string)
                            .map(Some)
                            .ok_or_else(|| PrepareError::UnparseableParameterValue {
                                value: string.clone(),
                            })
                    })
                    .collect::<PrepareResult<Vec<_>>>()?,
                _ => vec![sample.clone()],
            };

            rows = values
                .iter()
                .flat_map(|value| {
                    rows.iter().map(move |row| {
                        let mut row = row.clone();
                        row.push(value.clone());
                        row
                    })
                })
                .collect();
        }
        Ok(rows)
    }

    fn append_bindings(&self, mut text: String, rows: &[Vec<Option<Term>>]) -> String {
        if self.bindings.is_empty() {
            return text;
        }
        text.push_str("\nBINDINGS");
        for (name, _) in &self.bindings {
            let _ = write!(text, " ${}", name);
        }
        text.push_str(" {\n");
        for row in rows {
            text.push_str("\t(");
            for value in row {
                match value {
                    Some(term) => text.push_str(&write_value(term)),
                    None => text.push_str("UNDEF"),
                }
                text.push(' ');
            }
            text.push_str(")\n");
        }
        text.push_str("}\n");
        text
    }

    /// Parameters as a name-sorted list, the order-free form of the table
    fn sorted_bindings(&self) -> Vec<&(Arc<str>, Option<Term>)> {
        let mut sorted: Vec<_> = self.bindings.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
    }
}

/// Index of the last `BINDINGS`/`VALUES` keyword outside any braces
fn trailing_block(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    let mut found = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth = depth.saturating_sub(1),
            TokenKind::KwBindings | TokenKind::KwValues if depth == 0 => found = Some(i),
            _ => {}
        }
    }
    found
}

impl PartialEq for ParameterizedQuery {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
            && self.system_id == other.system_id
            && self.sorted_bindings() == other.sorted_bindings()
    }
}

impl Eq for ParameterizedQuery {}

impl Hash for ParameterizedQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
        self.system_id.hash(state);
        self.sorted_bindings().hash(state);
    }
}

impl std::fmt::Display for ParameterizedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rdfq_graph_ir::Datatype;

    const SYSTEM: &str = "http://example.org/app/page";

    fn params(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_plain_template_is_unchanged() {
        let query = ParameterizedQuery::new("SELECT * {}", SYSTEM, vec![], vec![]);
        assert_eq!(query.prepare(&HashMap::new()).unwrap(), "SELECT * {}");
    }

    #[test]
    fn test_sample_row() {
        let query = ParameterizedQuery::new(
            "SELECT * {}",
            SYSTEM,
            vec![],
            vec![(Arc::from("a"), Some(Term::plain("x"))), (Arc::from("b"), None)],
        );
        assert_eq!(
            query.prepare(&HashMap::new()).unwrap(),
            "SELECT * {}\nBINDINGS $a $b {\n\t(\"x\" UNDEF )\n}\n"
        );
    }

    #[test]
    fn test_values_follow_sample_shape() {
        let query = ParameterizedQuery::new(
            "SELECT * {}",
            SYSTEM,
            vec![],
            vec![
                (Arc::from("n"), Some(Term::integer(1))),
                (Arc::from("l"), Some(Term::lang_string("x", "en"))),
                (Arc::from("r"), Some(Term::iri("http://example.org/x"))),
            ],
        );
        assert_eq!(
            query.resolve_parameter("n", "42"),
            Some(Term::typed("42", Datatype::xsd_integer()))
        );
        assert_eq!(query.resolve_parameter("l", "chat"), Some(Term::lang_string("chat", "en")));
        assert_eq!(
            query.resolve_parameter("r", "../other"),
            Some(Term::iri("http://example.org/other"))
        );
        assert_eq!(query.resolve_parameter("missing", "12"), Some(Term::integer(12)));
        assert_eq!(query.resolve_parameter("missing", "%"), None);
    }

    #[test]
    fn test_cross_product_in_declaration_order() {
        let query = ParameterizedQuery::new(
            "SELECT * {}",
            SYSTEM,
            vec![],
            vec![(Arc::from("a"), None), (Arc::from("b"), None)],
        );
        let out = query
            .prepare(&params(&[("a", &["1", "2"]), ("b", &["\"x\"", "\"y\""])]))
            .unwrap();
        assert_eq!(
            out,
            "SELECT * {}\nBINDINGS $a $b {\n\
             \t(1 \"x\" )\n\t(2 \"x\" )\n\t(1 \"y\" )\n\t(2 \"y\" )\n}\n"
        );
    }

    #[test]
    fn test_unparseable_parameter() {
        let query =
            ParameterizedQuery::new("SELECT * {}", SYSTEM, vec![], vec![(Arc::from("a"), None)]);
        let err = query.prepare(&params(&[("a", &["not a term"])])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter value: not a term");
    }

    #[test]
    fn test_equality_ignores_binding_order() {
        let a = ParameterizedQuery::new(
            "Q",
            SYSTEM,
            vec![],
            vec![(Arc::from("x"), Some(Term::integer(1))), (Arc::from("y"), None)],
        );
        let b = ParameterizedQuery::new(
            "Q",
            SYSTEM,
            vec![("p".into(), "http://p/".into())],
            vec![(Arc::from("y"), None), (Arc::from("x"), Some(Term::integer(1)))],
        );
        assert_eq!(a, b);
        let c = ParameterizedQuery::new("Q", "http://other/", vec![], vec![]);
        assert_ne!(a, c);
    }
}
