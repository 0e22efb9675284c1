//! SPARQL expression parsing.
//!
//! ## SPARQL Expression Precedence (lowest to highest)
//!
//! 1. `||` (OR)
//! 2. `&&` (AND)
//! 3. `=`, `!=`, `<`, `<=`, `>`, `>=`, `IN`, `NOT IN`
//! 4. `+`, `-` (additive)
//! 5. `*`, `/` (multiplicative)
//! 6. `+`, `-`, `!` (unary)
//! 7. Primary expressions (literals, variables, function calls, parenthesized)

use crate::ast::{BinaryOp, Expression, FunctionName, UnaryOp};
use crate::error::Result;
use crate::lex::TokenKind;
use crate::parse::stream::TokenStream;
use rdfq_graph_ir::{Datatype, Term};
use rdfq_vocab::xsd;

/// Parse a SPARQL expression.
pub fn parse_expression(tokens: &mut TokenStream) -> Result<Expression> {
    parse_or_expr(tokens)
}

fn parse_or_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let mut left = parse_and_expr(tokens)?;
    while tokens.match_token(&TokenKind::Or) {
        let right = parse_and_expr(tokens)?;
        left = Expression::binary(BinaryOp::Or, left, right);
    }
    Ok(left)
}

fn parse_and_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let mut left = parse_relational_expr(tokens)?;
    while tokens.match_token(&TokenKind::And) {
        let right = parse_relational_expr(tokens)?;
        left = Expression::binary(BinaryOp::And, left, right);
    }
    Ok(left)
}

/// `=`, `!=`, `<`, `<=`, `>`, `>=`, `IN`, `NOT IN` (non-associative)
fn parse_relational_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let left = parse_additive_expr(tokens)?;

    let op = match tokens.peek().kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::Ne => Some(BinaryOp::Ne),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Ge => Some(BinaryOp::Ge),
        _ => None,
    };
    if let Some(op) = op {
        tokens.consume();
        let right = parse_additive_expr(tokens)?;
        return Ok(Expression::binary(op, left, right));
    }

    if tokens.match_token(&TokenKind::KwIn) {
        let list = parse_expression_list(tokens)?;
        return Ok(Expression::In {
            expr: Box::new(left),
            list,
            negated: false,
        });
    }

    if tokens.check(&TokenKind::KwNot) && matches!(tokens.peek_n(1).kind, TokenKind::KwIn) {
        tokens.consume();
        tokens.consume();
        let list = parse_expression_list(tokens)?;
        return Ok(Expression::In {
            expr: Box::new(left),
            list,
            negated: true,
        });
    }

    Ok(left)
}

fn parse_additive_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let mut left = parse_multiplicative_expr(tokens)?;
    loop {
        let op = match tokens.peek().kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            _ => break,
        };
        tokens.consume();
        let right = parse_multiplicative_expr(tokens)?;
        left = Expression::binary(op, left, right);
    }
    Ok(left)
}

fn parse_multiplicative_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let mut left = parse_unary_expr(tokens)?;
    loop {
        let op = match tokens.peek().kind {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => break,
        };
        tokens.consume();
        let right = parse_unary_expr(tokens)?;
        left = Expression::binary(op, left, right);
    }
    Ok(left)
}

fn parse_unary_expr(tokens: &mut TokenStream) -> Result<Expression> {
    let op = match tokens.peek().kind {
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Plus => UnaryOp::Pos,
        TokenKind::Minus => UnaryOp::Neg,
        _ => return parse_primary_expr(tokens),
    };
    tokens.consume();
    let operand = parse_unary_expr(tokens)?;
    Ok(Expression::unary(op, operand))
}

fn parse_primary_expr(tokens: &mut TokenStream) -> Result<Expression> {
    if tokens.match_token(&TokenKind::LParen) {
        let inner = parse_expression(tokens)?;
        tokens.expect(&TokenKind::RParen, "')'")?;
        return Ok(inner);
    }

    if let TokenKind::Var(name) = &tokens.peek().kind {
        let name = name.clone();
        tokens.consume();
        return Ok(Expression::Var(name));
    }

    // EXISTS {} / NOT EXISTS {}
    if tokens.check(&TokenKind::KwExists) {
        tokens.consume();
        parse_empty_group(tokens)?;
        return Ok(Expression::Exists { negated: false });
    }
    if tokens.check(&TokenKind::KwNot) && matches!(tokens.peek_n(1).kind, TokenKind::KwExists) {
        tokens.consume();
        tokens.consume();
        parse_empty_group(tokens)?;
        return Ok(Expression::Exists { negated: true });
    }

    if let TokenKind::Name(name) = &tokens.peek().kind {
        let name = name.clone();
        let function = FunctionName::parse(&name)
            .ok_or_else(|| tokens.error(format!("unknown function '{}'", name)))?;
        tokens.consume();
        let args = parse_arg_list(tokens)?;
        return Ok(Expression::call(function, args));
    }

    let iri_start = matches!(
        tokens.peek().kind,
        TokenKind::Iri(_) | TokenKind::PrefixedName { .. } | TokenKind::PrefixedNameNs(_)
    );
    if iri_start && matches!(tokens.peek_n(1).kind, TokenKind::LParen) {
        return parse_cast(tokens);
    }

    match try_parse_constant(tokens)? {
        Some(term) => Ok(Expression::Term(term)),
        None => Err(tokens.error(format!("expected expression, found {}", tokens.peek().kind))),
    }
}

/// `xsd:type(expr)`; other IRI functions are not available inline
fn parse_cast(tokens: &mut TokenStream) -> Result<Expression> {
    let iri = parse_iri(tokens)?;
    let castable = matches!(
        iri.as_str(),
        xsd::STRING | xsd::INTEGER | xsd::DECIMAL | xsd::DOUBLE | xsd::FLOAT | xsd::BOOLEAN
    );
    if !castable {
        return Err(tokens.error(format!("unsupported function <{}>", iri)));
    }
    let mut args = parse_arg_list(tokens)?;
    if args.len() != 1 {
        return Err(tokens.error(format!("<{}> takes exactly one argument", iri)));
    }
    Ok(Expression::Cast {
        datatype: Datatype::from_iri(iri),
        arg: Box::new(args.remove(0)),
    })
}

/// `( [expr (, expr)*] )`
fn parse_arg_list(tokens: &mut TokenStream) -> Result<Vec<Expression>> {
    tokens.expect(&TokenKind::LParen, "'('")?;
    let mut args = Vec::new();
    if tokens.match_token(&TokenKind::RParen) {
        return Ok(args);
    }
    loop {
        args.push(parse_expression(tokens)?);
        if tokens.match_token(&TokenKind::Comma) {
            continue;
        }
        tokens.expect(&TokenKind::RParen, "')' or ','")?;
        return Ok(args);
    }
}

fn parse_expression_list(tokens: &mut TokenStream) -> Result<Vec<Expression>> {
    parse_arg_list(tokens)
}

/// `{}`; the evaluator has no dataset to match patterns against
fn parse_empty_group(tokens: &mut TokenStream) -> Result<()> {
    tokens.expect(&TokenKind::LBrace, "'{'")?;
    if !tokens.check(&TokenKind::RBrace) {
        return Err(tokens.error("only an empty group pattern is supported"));
    }
    tokens.consume();
    Ok(())
}

/// An IRI, as `<...>` or a prefixed name, expanded to absolute form.
pub(crate) fn parse_iri(tokens: &mut TokenStream) -> Result<String> {
    match tokens.peek().kind.clone() {
        TokenKind::Iri(iri) => {
            tokens.consume();
            Ok(tokens.resolve_iri(&iri))
        }
        TokenKind::PrefixedName { prefix, local } => {
            let expanded = tokens.expand_prefixed(&prefix, &local)?;
            tokens.consume();
            Ok(expanded)
        }
        TokenKind::PrefixedNameNs(prefix) => {
            let expanded = tokens.expand_prefixed(&prefix, "")?;
            tokens.consume();
            Ok(expanded)
        }
        other => Err(tokens.error(format!("expected IRI, found {}", other))),
    }
}

/// An RDF constant: IRI, literal, number, boolean or blank node label.
///
/// Returns `Ok(None)` without consuming anything when the current token
/// cannot start a constant. A sign directly before a number is folded into
/// its lexical form.
pub(crate) fn try_parse_constant(tokens: &mut TokenStream) -> Result<Option<Term>> {
    let signed = matches!(tokens.peek().kind, TokenKind::Plus | TokenKind::Minus)
        && matches!(
            tokens.peek_n(1).kind,
            TokenKind::Integer(_) | TokenKind::Decimal(_) | TokenKind::Double(_)
        );
    let sign = if !signed {
        ""
    } else if tokens.consume().kind == TokenKind::Minus {
        "-"
    } else {
        "+"
    };

    let term = match tokens.peek().kind.clone() {
        TokenKind::Integer(lex) => {
            tokens.consume();
            Term::typed(format!("{sign}{lex}"), Datatype::xsd_integer())
        }
        TokenKind::Decimal(lex) => {
            tokens.consume();
            Term::typed(format!("{sign}{lex}"), Datatype::xsd_decimal())
        }
        TokenKind::Double(lex) => {
            tokens.consume();
            Term::typed(format!("{sign}{lex}"), Datatype::xsd_double())
        }
        TokenKind::KwTrue => {
            tokens.consume();
            Term::boolean(true)
        }
        TokenKind::KwFalse => {
            tokens.consume();
            Term::boolean(false)
        }
        TokenKind::BlankNodeLabel(label) => {
            tokens.consume();
            Term::blank(label.as_ref())
        }
        TokenKind::String(value) => {
            tokens.consume();
            if let TokenKind::LangTag(lang) = &tokens.peek().kind {
                let lang = lang.clone();
                tokens.consume();
                Term::lang_string(value.as_ref(), lang.as_ref())
            } else if tokens.match_token(&TokenKind::DoubleCaret) {
                let datatype = parse_iri(tokens)?;
                Term::typed(value.as_ref(), Datatype::from_iri(datatype))
            } else {
                Term::plain(value.as_ref())
            }
        }
        TokenKind::Iri(_) | TokenKind::PrefixedName { .. } | TokenKind::PrefixedNameNs(_) => {
            Term::iri(parse_iri(tokens)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(term))
}
