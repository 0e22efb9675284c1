//! RDF term function implementations
//!
//! Implements STR, LANG, DATATYPE, IRI, BNODE, STRDT, STRLANG, sameTerm
//! and LANGMATCHES.

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};
use rdfq_graph_ir::{iri, Datatype, Term};
use std::sync::Arc;

use super::eval::{evaluate, EvalContext};
use super::helpers::{check_arity, check_arity_range, string_arg};
use super::uuid::fresh_label;
use super::value::ComparableValue;

pub fn eval_rdf_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    match name {
        FunctionName::Str => {
            check_arity(args, 1, "STR")?;
            let value = evaluate(&args[0], ctx)?;
            value
                .lexical()
                .map(ComparableValue::string)
                .ok_or_else(|| EvalError::type_error("STR of a blank node"))
        }

        FunctionName::Lang => {
            check_arity(args, 1, "LANG")?;
            match evaluate(&args[0], ctx)? {
                ComparableValue::String { lang, .. } => {
                    Ok(ComparableValue::string(lang.as_deref().unwrap_or("")))
                }
                value if value.is_literal() => Ok(ComparableValue::string("")),
                _ => Err(EvalError::type_error("LANG of a non-literal")),
            }
        }

        FunctionName::Datatype => {
            check_arity(args, 1, "DATATYPE")?;
            let value = evaluate(&args[0], ctx)?;
            value
                .datatype_iri()
                .map(|dt| ComparableValue::Iri(Arc::from(dt)))
                .ok_or_else(|| EvalError::type_error("DATATYPE of a non-literal"))
        }

        FunctionName::Iri => {
            check_arity(args, 1, "IRI")?;
            match evaluate(&args[0], ctx)? {
                ComparableValue::Iri(value) => Ok(ComparableValue::Iri(value)),
                ComparableValue::String {
                    value: text,
                    lang: None,
                } => Ok(ComparableValue::Iri(Arc::from(match ctx.base() {
                    Some(base) => iri::resolve(base, &text),
                    None => text.to_string(),
                }))),
                other => Err(EvalError::type_error(format!("IRI of {:?}", other))),
            }
        }

        FunctionName::BNode => {
            check_arity_range(args, 0, 1, "BNODE")?;
            match args.first() {
                None => Ok(ComparableValue::Blank(Arc::from(fresh_label()))),
                Some(arg) => {
                    let key = string_arg(arg, ctx, "BNODE")?;
                    if key.lang.is_some() {
                        return Err(EvalError::type_error("BNODE of a language-tagged string"));
                    }
                    Ok(ComparableValue::Blank(ctx.bnode_for(&key.value)))
                }
            }
        }

        FunctionName::StrDt => {
            check_arity(args, 2, "STRDT")?;
            let lexical = string_arg(&args[0], ctx, "STRDT")?;
            if lexical.lang.is_some() {
                return Err(EvalError::type_error("STRDT of a language-tagged string"));
            }
            match evaluate(&args[1], ctx)? {
                ComparableValue::Iri(dt) => {
                    let term = Term::typed(lexical.value.as_ref(), Datatype::from_iri(dt.as_ref()));
                    ComparableValue::from_term(&term)
                        .ok_or_else(|| EvalError::type_error("STRDT produced no value"))
                }
                other => Err(EvalError::type_error(format!("STRDT datatype {:?}", other))),
            }
        }

        FunctionName::StrLang => {
            check_arity(args, 2, "STRLANG")?;
            let lexical = string_arg(&args[0], ctx, "STRLANG")?;
            let lang = string_arg(&args[1], ctx, "STRLANG")?;
            if lexical.lang.is_some() || lang.value.is_empty() {
                return Err(EvalError::type_error("STRLANG needs a simple string and a tag"));
            }
            Ok(ComparableValue::String {
                value: lexical.value,
                lang: Some(lang.value),
            })
        }

        FunctionName::SameTerm => {
            check_arity(args, 2, "sameTerm")?;
            let left = evaluate(&args[0], ctx)?.into_term();
            let right = evaluate(&args[1], ctx)?.into_term();
            Ok(ComparableValue::Bool(left == right))
        }

        FunctionName::LangMatches => {
            check_arity(args, 2, "LANGMATCHES")?;
            let tag = string_arg(&args[0], ctx, "LANGMATCHES")?.value;
            let range = string_arg(&args[1], ctx, "LANGMATCHES")?.value;
            Ok(ComparableValue::Bool(lang_matches(&tag, &range)))
        }

        other => Err(EvalError::type_error(format!("{} is not an RDF term function", other))),
    }
}

/// RFC 4647 basic filtering
fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range || tag.starts_with(&format!("{}-", range))
}
