//! Type-checking function implementations
//!
//! Implements SPARQL type-checking functions: BOUND, isIRI, isBLANK,
//! isLITERAL, isNUMERIC

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};

use super::eval::{evaluate, EvalContext};
use super::helpers::check_arity;
use super::value::ComparableValue;

pub fn eval_type_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    check_arity(args, 1, name.as_str())?;

    if name == FunctionName::Bound {
        return match &args[0] {
            Expression::Var(var) => Ok(ComparableValue::Bool(ctx.row().contains_key(var))),
            _ => Err(EvalError::type_error("BOUND argument must be a variable")),
        };
    }

    let value = evaluate(&args[0], ctx)?;
    Ok(ComparableValue::Bool(match name {
        FunctionName::IsIri => matches!(value, ComparableValue::Iri(_)),
        FunctionName::IsBlank => matches!(value, ComparableValue::Blank(_)),
        FunctionName::IsLiteral => value.is_literal(),
        _ => value.is_numeric(),
    }))
}
