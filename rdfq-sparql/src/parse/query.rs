//! Query-level parsing: prologue, SELECT clause, solution modifiers and
//! the trailing `VALUES` / `BINDINGS` table.

use super::expr::{parse_expression, try_parse_constant};
use super::stream::TokenStream;
use crate::ast::{Projection, ProjectionItem, Query, SelectModifier, ValuesBlock};
use crate::error::Result;
use crate::lex::{tokenize, TokenKind};
use std::sync::Arc;
use tracing::trace;

/// Parse a complete query.
pub fn parse_query(text: &str) -> Result<Query> {
    let mut tokens = TokenStream::new(tokenize(text)?);

    parse_prologue(&mut tokens)?;

    tokens.expect(&TokenKind::KwSelect, "SELECT")?;
    let modifier = if tokens.match_token(&TokenKind::KwDistinct) {
        Some(SelectModifier::Distinct)
    } else if tokens.match_token(&TokenKind::KwReduced) {
        Some(SelectModifier::Reduced)
    } else {
        None
    };
    let projection = parse_projection(&mut tokens)?;

    tokens.match_token(&TokenKind::KwWhere);
    tokens.expect(&TokenKind::LBrace, "'{'")?;
    if !tokens.check(&TokenKind::RBrace) {
        return Err(tokens.error("only an empty group pattern is supported"));
    }
    tokens.consume();

    let mut limit = None;
    let mut offset = None;
    loop {
        if tokens.match_token(&TokenKind::KwLimit) {
            limit = Some(parse_count(&mut tokens, "LIMIT")?);
        } else if tokens.match_token(&TokenKind::KwOffset) {
            offset = Some(parse_count(&mut tokens, "OFFSET")?);
        } else {
            break;
        }
    }

    let values = parse_values_block(&mut tokens)?;

    if !tokens.is_eof() {
        return Err(tokens.error(format!("unexpected {}", tokens.peek().kind)));
    }

    trace!(?projection, ?limit, ?offset, "parsed query");
    Ok(Query {
        prologue: tokens.take_prologue(),
        modifier,
        projection,
        limit,
        offset,
        values,
    })
}

/// `(BASE <iri> | PREFIX p: <iri>)*`
pub fn parse_prologue(tokens: &mut TokenStream) -> Result<()> {
    loop {
        if tokens.match_token(&TokenKind::KwBase) {
            match tokens.consume().kind {
                TokenKind::Iri(iri) => tokens.set_base(iri),
                other => return Err(tokens.error(format!("expected IRI after BASE, found {}", other))),
            }
        } else if tokens.match_token(&TokenKind::KwPrefix) {
            let prefix = match tokens.consume().kind {
                TokenKind::PrefixedNameNs(prefix) => prefix,
                other => {
                    return Err(tokens.error(format!("expected prefix name, found {}", other)))
                }
            };
            match tokens.consume().kind {
                TokenKind::Iri(iri) => tokens.add_prefix(prefix, &iri),
                other => {
                    return Err(tokens.error(format!("expected IRI after PREFIX, found {}", other)))
                }
            }
        } else {
            return Ok(());
        }
    }
}

fn parse_projection(tokens: &mut TokenStream) -> Result<Projection> {
    if tokens.match_token(&TokenKind::Star) {
        return Ok(Projection::Star);
    }

    let mut items = Vec::new();
    loop {
        match tokens.peek().kind.clone() {
            TokenKind::Var(name) => {
                tokens.consume();
                items.push(ProjectionItem::Var(name));
            }
            TokenKind::LParen => {
                tokens.consume();
                let expr = parse_expression(tokens)?;
                tokens.expect(&TokenKind::KwAs, "AS")?;
                let alias = tokens.expect_var()?;
                tokens.expect(&TokenKind::RParen, "')'")?;
                items.push(ProjectionItem::Expr { expr, alias });
            }
            _ => break,
        }
    }

    if items.is_empty() {
        return Err(tokens.error("expected projection"));
    }
    Ok(Projection::Items(items))
}

fn parse_count(tokens: &mut TokenStream, clause: &str) -> Result<u64> {
    match tokens.consume().kind {
        TokenKind::Integer(digits) => digits
            .parse()
            .map_err(|_| tokens.error(format!("{} value out of range", clause))),
        other => Err(tokens.error(format!("expected integer after {}, found {}", clause, other))),
    }
}

/// `VALUES ?x { v* }`, `VALUES (?x ?y) { (v v)* }` or `BINDINGS ?x ?y { (v v)* }`
pub fn parse_values_block(tokens: &mut TokenStream) -> Result<Option<ValuesBlock>> {
    if !tokens.match_token(&TokenKind::KwValues) && !tokens.match_token(&TokenKind::KwBindings) {
        return Ok(None);
    }

    let mut vars: Vec<Arc<str>> = Vec::new();
    let parenthesized = tokens.match_token(&TokenKind::LParen);
    while let TokenKind::Var(name) = &tokens.peek().kind {
        vars.push(name.clone());
        tokens.consume();
    }
    if parenthesized {
        tokens.expect(&TokenKind::RParen, "')'")?;
    }

    tokens.expect(&TokenKind::LBrace, "'{'")?;
    let mut rows = Vec::new();
    while !tokens.match_token(&TokenKind::RBrace) {
        if tokens.match_token(&TokenKind::LParen) {
            let mut row = Vec::with_capacity(vars.len());
            while !tokens.match_token(&TokenKind::RParen) {
                row.push(parse_data_value(tokens)?);
            }
            if row.len() != vars.len() {
                return Err(tokens.error(format!(
                    "row has {} values for {} variables",
                    row.len(),
                    vars.len()
                )));
            }
            rows.push(row);
        } else if vars.len() == 1 {
            rows.push(vec![parse_data_value(tokens)?]);
        } else {
            return Err(tokens.error(format!("expected '(', found {}", tokens.peek().kind)));
        }
    }

    Ok(Some(ValuesBlock { vars, rows }))
}

fn parse_data_value(tokens: &mut TokenStream) -> Result<Option<rdfq_graph_ir::Term>> {
    if tokens.match_token(&TokenKind::KwUndef) {
        return Ok(None);
    }
    match try_parse_constant(tokens)? {
        Some(term) => Ok(Some(term)),
        None => Err(tokens.error(format!("expected data value, found {}", tokens.peek().kind))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use pretty_assertions::assert_eq;
    use rdfq_graph_ir::Term;

    #[test]
    fn test_parse_inline_expression_query() {
        let query =
            parse_query("PREFIX ex: <http://example.org/>\nSELECT (ex:a AS ?_value) {} LIMIT 1")
                .unwrap();
        assert_eq!(query.limit, Some(1));
        assert_eq!(query.prologue.namespace("ex"), Some("http://example.org/"));
        assert_eq!(
            query.projection,
            Projection::Items(vec![ProjectionItem::Expr {
                expr: Expression::Term(Term::iri("http://example.org/a")),
                alias: Arc::from("_value"),
            }])
        );
    }

    #[test]
    fn test_parse_bindings_table() {
        let query = parse_query(
            "SELECT * WHERE {}\nBINDINGS $a $b {\n\t(1 UNDEF )\n\t(\"x\"@en <http://example.org/> )\n}\n",
        )
        .unwrap();
        let values = query.values.unwrap();
        assert_eq!(values.vars, vec![Arc::<str>::from("a"), Arc::from("b")]);
        assert_eq!(
            values.rows,
            vec![
                vec![Some(Term::integer(1)), None],
                vec![
                    Some(Term::lang_string("x", "en")),
                    Some(Term::iri("http://example.org/"))
                ],
            ]
        );
    }

    #[test]
    fn test_parse_single_var_values() {
        let query = parse_query("SELECT ?x {} VALUES ?x { -1 2.5 }").unwrap();
        let values = query.values.unwrap();
        assert_eq!(values.rows.len(), 2);
        assert_eq!(values.rows[0], vec![Some(Term::integer(-1))]);
    }

    #[test]
    fn test_non_empty_group_rejected() {
        let err = parse_query("SELECT * { ?s ?p ?o }").unwrap_err();
        assert!(err.to_string().contains("empty group"));
    }

    #[test]
    fn test_undefined_prefix() {
        assert!(parse_query("SELECT (foaf:name AS ?v) {}").is_err());
    }
}
