//! Shared helpers for function evaluation

use crate::ast::Expression;
use crate::error::{EvalError, EvalResult};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use super::eval::{evaluate, EvalContext};
use super::value::ComparableValue;

/// Check that a function received exactly `expected` arguments
pub fn check_arity(args: &[Expression], expected: usize, fn_name: &'static str) -> EvalResult<()> {
    if args.len() == expected {
        return Ok(());
    }
    Err(EvalError::Arity {
        function: fn_name,
        expected: match expected {
            0 => "no arguments",
            1 => "exactly 1 argument",
            2 => "exactly 2 arguments",
            _ => "exactly 3 arguments",
        },
    })
}

/// Check that a function received between `min` and `max` arguments
pub fn check_arity_range(
    args: &[Expression],
    min: usize,
    max: usize,
    fn_name: &'static str,
) -> EvalResult<()> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    Err(EvalError::Arity {
        function: fn_name,
        expected: match (min, max) {
            (0, 1) => "at most 1 argument",
            (1, 2) => "1 or 2 arguments",
            (2, 3) => "2 or 3 arguments",
            _ => "3 or 4 arguments",
        },
    })
}

/// Build a regex from a SPARQL pattern and XPath flags (`i`, `m`, `s`, `x`)
pub fn build_regex_with_flags(pattern: &str, flags: &str) -> EvalResult<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            c => return Err(EvalError::Regex(format!("unknown regex flag '{}'", c))),
        }
    }
    builder.build().map_err(|e| EvalError::Regex(e.to_string()))
}

/// A string literal argument: its value and language tag
pub struct StringArg {
    pub value: Arc<str>,
    pub lang: Option<Arc<str>>,
}

impl StringArg {
    /// Rebuild a string value carrying this argument's language tag
    pub fn with_value(&self, value: impl AsRef<str>) -> ComparableValue {
        ComparableValue::String {
            value: Arc::from(value.as_ref()),
            lang: self.lang.clone(),
        }
    }

    /// Argument compatibility for the two-argument string functions
    pub fn compatible_with(&self, other: &StringArg) -> bool {
        other.lang.is_none() || self.lang == other.lang
    }
}

/// Evaluate an argument that must be a string literal
pub fn string_arg(expr: &Expression, ctx: &EvalContext<'_>, fn_name: &str) -> EvalResult<StringArg> {
    match evaluate(expr, ctx)? {
        ComparableValue::String { value, lang } => Ok(StringArg { value, lang }),
        other => Err(EvalError::type_error(format!(
            "{} expects a string literal, got {:?}",
            fn_name, other
        ))),
    }
}

/// Evaluate two string arguments and check they are compatible
pub fn compatible_string_args(
    args: &[Expression],
    ctx: &EvalContext<'_>,
    fn_name: &str,
) -> EvalResult<(StringArg, StringArg)> {
    let first = string_arg(&args[0], ctx, fn_name)?;
    let second = string_arg(&args[1], ctx, fn_name)?;
    if !first.compatible_with(&second) {
        return Err(EvalError::type_error(format!(
            "{} arguments have incompatible language tags",
            fn_name
        )));
    }
    Ok((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_flags() {
        let re = build_regex_with_flags("^abc", "i").unwrap();
        assert!(re.is_match("ABCdef"));
        let re = build_regex_with_flags("a.b", "s").unwrap();
        assert!(re.is_match("a\nb"));
        assert!(build_regex_with_flags("a", "q").is_err());
        assert!(build_regex_with_flags("(", "").is_err());
    }

    #[test]
    fn test_arity() {
        assert!(check_arity(&[], 0, "NOW").is_ok());
        assert_eq!(
            check_arity(&[], 1, "STR"),
            Err(EvalError::Arity {
                function: "STR",
                expected: "exactly 1 argument",
            })
        );
    }
}
