//! Term serialization and value parsing
//!
//! [`write_value`] renders a term in SPARQL concrete syntax. [`parse_value`]
//! reads a single serialized term back, expanding prefixed names and
//! relative IRIs against a prologue. Malformed input has no value.

use crate::ast::Prologue;
use crate::lex::{chars, tokenize};
use crate::parse::expr::try_parse_constant;
use crate::parse::TokenStream;
use num_bigint::BigInt;
use rdfq_graph_ir::{LiteralTag, Term};
use std::fmt::Write as _;
use std::str::FromStr;

/// Serialize a term as it must appear in query text.
///
/// References and compact IRIs are written as absolute IRIs.
pub fn write_value(term: &Term) -> String {
    match term {
        Term::Var(name) => format!("?{}", name),
        Term::Blank(id) => id.to_string(),
        Term::Literal { lexical, tag } => write_literal(lexical, tag),
        other => match other.as_iri() {
            Some(iri) => write_iri(iri),
            None => other.string_value(),
        },
    }
}

/// `<iri>` with characters outside IRIREF escaped
pub fn write_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len() + 2);
    out.push('<');
    for c in iri.chars() {
        if chars::is_iri_char(c) {
            out.push(c);
        } else if (c as u32) <= 0xFFFF {
            let _ = write!(out, "\\u{:04X}", c as u32);
        } else {
            let _ = write!(out, "\\U{:08X}", c as u32);
        }
    }
    out.push('>');
    out
}

/// Quoted literal with its language tag or datatype.
///
/// `xsd:integer` literals with a valid lexical form are written bare, in
/// canonical form.
pub fn write_literal(lexical: &str, tag: &LiteralTag) -> String {
    match tag {
        LiteralTag::Simple => quote(lexical),
        LiteralTag::Lang(lang) => format!("{}@{}", quote(lexical), lang),
        LiteralTag::Typed(datatype) => {
            if datatype.is_integer() {
                if let Ok(n) = BigInt::from_str(lexical) {
                    return n.to_string();
                }
            }
            format!("{}^^{}", quote(lexical), write_iri(datatype.as_iri()))
        }
    }
}

/// Double-quoted string with `\\ \" \n \r \t` escaped
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Parse one serialized term.
///
/// The first character decides the kind: `<` an IRI, a prefix character or
/// `:` a prefixed name or boolean, `_` a blank node, `"` a literal, a digit,
/// `.`, `+` or `-` a number. Anything else, trailing input, or a prefix not
/// declared in `prologue` yields `None`.
pub fn parse_value(text: &str, prologue: &Prologue) -> Option<Term> {
    let first = text.chars().next()?;
    let dispatchable = matches!(first, '<' | ':' | '_' | '"' | '.' | '+' | '-')
        || first.is_ascii_digit()
        || chars::is_pn_prefix_start(first);
    if !dispatchable {
        return None;
    }

    let tokens = tokenize(text).ok()?;
    let mut stream = TokenStream::with_prologue(tokens, prologue.clone());
    let term = try_parse_constant(&mut stream).ok()??;
    stream.is_eof().then_some(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rdfq_graph_ir::Datatype;
    use rdfq_vocab::xsd;
    use std::sync::Arc;

    fn prologue() -> Prologue {
        Prologue {
            base: Some(Arc::from("http://example.org/dir/")),
            prefixes: vec![(Arc::from("foaf"), Arc::from("http://xmlns.com/foaf/0.1/"))],
        }
    }

    fn parse(text: &str) -> Option<Term> {
        parse_value(text, &prologue())
    }

    #[test]
    fn test_write_integer_canonical() {
        assert_eq!(write_value(&Term::typed("+007", Datatype::xsd_integer())), "7");
        assert_eq!(
            write_value(&Term::typed("seven", Datatype::xsd_integer())),
            format!("\"seven\"^^<{}>", xsd::INTEGER)
        );
    }

    #[test]
    fn test_write_literals() {
        assert_eq!(write_value(&Term::plain("a\"b\n")), r#""a\"b\n""#);
        assert_eq!(write_value(&Term::lang_string("chat", "fr")), r#""chat"@fr"#);
        assert_eq!(
            write_value(&Term::typed("1.5", Datatype::xsd_decimal())),
            format!("\"1.5\"^^<{}>", xsd::DECIMAL)
        );
    }

    #[test]
    fn test_write_iri_escapes() {
        assert_eq!(write_value(&Term::iri("http://x/a b")), r"<http://x/a\u0020b>");
        assert_eq!(write_value(&Term::blank("n1")), "_:n1");
    }

    #[test]
    fn test_parse_iris() {
        assert_eq!(parse("<page>"), Some(Term::iri("http://example.org/dir/page")));
        assert_eq!(parse("foaf:name"), Some(Term::iri("http://xmlns.com/foaf/0.1/name")));
        assert_eq!(parse("ex:name"), None);
        assert_eq!(parse("<a>b>"), None);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("true"), Some(Term::boolean(true)));
        assert_eq!(parse("_:b0"), Some(Term::blank("b0")));
        assert_eq!(parse(r#""chat"@fr"#), Some(Term::lang_string("chat", "fr")));
        assert_eq!(
            parse("\"\"\"two\nlines\"\"\""),
            Some(Term::plain("two\nlines"))
        );
        assert_eq!(
            parse(r#""5"^^<http://www.w3.org/2001/XMLSchema#int>"#),
            Some(Term::typed("5", Datatype::from_iri("http://www.w3.org/2001/XMLSchema#int")))
        );
        assert_eq!(parse(r#""x"^^"y""#), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse("-12"), Some(Term::typed("-12", Datatype::xsd_integer())));
        assert_eq!(parse("1.50"), Some(Term::typed("1.50", Datatype::xsd_decimal())));
        assert_eq!(parse("1e3"), Some(Term::typed("1e3", Datatype::xsd_double())));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("?x"), None);
        assert_eq!(parse("'single'"), None);
        assert_eq!(parse("1 2"), None);
    }

    #[test]
    fn test_written_values_parse_back() {
        for term in [
            Term::plain("tab\there"),
            Term::lang_string("x", "en-GB"),
            Term::iri("http://example.org/a#b"),
            Term::integer(-40),
        ] {
            assert_eq!(parse(&write_value(&term)), Some(term));
        }
    }
}
