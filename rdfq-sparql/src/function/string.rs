//! String function implementations
//!
//! Implements SPARQL string functions: STRLEN, SUBSTR, UCASE, LCASE,
//! STRSTARTS, STRENDS, CONTAINS, STRBEFORE, STRAFTER, ENCODE_FOR_URI,
//! CONCAT, REGEX, REPLACE

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};
use num_bigint::BigInt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

use super::eval::{evaluate, EvalContext};
use super::helpers::{
    build_regex_with_flags, check_arity, check_arity_range, compatible_string_args, string_arg,
};
use super::value::ComparableValue;

/// RFC 3986 unreserved characters pass through ENCODE_FOR_URI untouched
const URI_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Evaluate a string function
pub fn eval_string_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    match name {
        FunctionName::Strlen => {
            check_arity(args, 1, "STRLEN")?;
            let s = string_arg(&args[0], ctx, "STRLEN")?;
            Ok(ComparableValue::Integer(BigInt::from(s.value.chars().count())))
        }

        FunctionName::Substr => {
            check_arity_range(args, 2, 3, "SUBSTR")?;
            let s = string_arg(&args[0], ctx, "SUBSTR")?;
            let start = integer_arg(&args[1], ctx, "SUBSTR")?;
            let length = match args.get(2) {
                Some(arg) => Some(integer_arg(arg, ctx, "SUBSTR")?),
                None => None,
            };
            Ok(s.with_value(substring(&s.value, start, length)))
        }

        FunctionName::Ucase => {
            check_arity(args, 1, "UCASE")?;
            let s = string_arg(&args[0], ctx, "UCASE")?;
            Ok(s.with_value(s.value.to_uppercase()))
        }

        FunctionName::Lcase => {
            check_arity(args, 1, "LCASE")?;
            let s = string_arg(&args[0], ctx, "LCASE")?;
            Ok(s.with_value(s.value.to_lowercase()))
        }

        FunctionName::StrStarts => {
            check_arity(args, 2, "STRSTARTS")?;
            let (haystack, prefix) = compatible_string_args(args, ctx, "STRSTARTS")?;
            Ok(ComparableValue::Bool(haystack.value.starts_with(prefix.value.as_ref())))
        }

        FunctionName::StrEnds => {
            check_arity(args, 2, "STRENDS")?;
            let (haystack, suffix) = compatible_string_args(args, ctx, "STRENDS")?;
            Ok(ComparableValue::Bool(haystack.value.ends_with(suffix.value.as_ref())))
        }

        FunctionName::Contains => {
            check_arity(args, 2, "CONTAINS")?;
            let (haystack, needle) = compatible_string_args(args, ctx, "CONTAINS")?;
            Ok(ComparableValue::Bool(haystack.value.contains(needle.value.as_ref())))
        }

        FunctionName::StrBefore => {
            check_arity(args, 2, "STRBEFORE")?;
            let (haystack, needle) = compatible_string_args(args, ctx, "STRBEFORE")?;
            Ok(match haystack.value.find(needle.value.as_ref()) {
                Some(idx) => haystack.with_value(&haystack.value[..idx]),
                None => ComparableValue::string(""),
            })
        }

        FunctionName::StrAfter => {
            check_arity(args, 2, "STRAFTER")?;
            let (haystack, needle) = compatible_string_args(args, ctx, "STRAFTER")?;
            Ok(match haystack.value.find(needle.value.as_ref()) {
                Some(idx) => haystack.with_value(&haystack.value[idx + needle.value.len()..]),
                None => ComparableValue::string(""),
            })
        }

        FunctionName::EncodeForUri => {
            check_arity(args, 1, "ENCODE_FOR_URI")?;
            let s = string_arg(&args[0], ctx, "ENCODE_FOR_URI")?;
            Ok(ComparableValue::string(
                utf8_percent_encode(&s.value, URI_UNRESERVED).to_string(),
            ))
        }

        FunctionName::Concat => {
            let mut out = String::new();
            let mut lang: Option<Option<Arc<str>>> = None;
            for arg in args {
                let s = string_arg(arg, ctx, "CONCAT")?;
                out.push_str(&s.value);
                lang = match lang {
                    None => Some(s.lang),
                    Some(prev) if prev == s.lang => Some(prev),
                    Some(_) => Some(None),
                };
            }
            Ok(ComparableValue::String {
                value: Arc::from(out),
                lang: lang.flatten(),
            })
        }

        FunctionName::Regex => {
            check_arity_range(args, 2, 3, "REGEX")?;
            let text = string_arg(&args[0], ctx, "REGEX")?;
            let pattern = string_arg(&args[1], ctx, "REGEX")?;
            let flags = match args.get(2) {
                Some(arg) => string_arg(arg, ctx, "REGEX")?.value,
                None => Arc::from(""),
            };
            let re = build_regex_with_flags(&pattern.value, &flags)?;
            Ok(ComparableValue::Bool(re.is_match(&text.value)))
        }

        FunctionName::Replace => {
            check_arity_range(args, 3, 4, "REPLACE")?;
            let text = string_arg(&args[0], ctx, "REPLACE")?;
            let pattern = string_arg(&args[1], ctx, "REPLACE")?;
            let replacement = string_arg(&args[2], ctx, "REPLACE")?;
            let flags = match args.get(3) {
                Some(arg) => string_arg(arg, ctx, "REPLACE")?.value,
                None => Arc::from(""),
            };
            let re = build_regex_with_flags(&pattern.value, &flags)?;
            if re.is_match("") {
                return Err(EvalError::Regex(
                    "REPLACE pattern matches the empty string".to_string(),
                ));
            }
            let replaced = re.replace_all(&text.value, replacement.value.as_ref());
            Ok(text.with_value(replaced))
        }

        _ => unreachable!("Non-string function routed to string module: {:?}", name),
    }
}

/// SUBSTR position arguments are rounded numerics
fn integer_arg(expr: &Expression, ctx: &EvalContext<'_>, fn_name: &str) -> EvalResult<i64> {
    let value = evaluate(expr, ctx)?;
    if !value.is_numeric() {
        return Err(EvalError::type_error(format!(
            "{} expects a numeric argument, got {:?}",
            fn_name, value
        )));
    }
    match value.to_f64() {
        Some(n) if n.is_finite() => Ok(n.round() as i64),
        _ => Err(EvalError::type_error(format!("{} position is not finite", fn_name))),
    }
}

/// Characters at 1-based positions `[start, start + length)`
fn substring(s: &str, start: i64, length: Option<i64>) -> String {
    let end = length.map(|len| start.saturating_add(len));
    s.chars()
        .enumerate()
        .filter(|(idx, _)| {
            let pos = *idx as i64 + 1;
            pos >= start && end.map_or(true, |end| pos < end)
        })
        .map(|(_, c)| c)
        .collect()
}
