//! Conditional function implementations
//!
//! Implements SPARQL conditional functions: IF, COALESCE

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};

use super::eval::{evaluate, EvalContext};
use super::helpers::check_arity;
use super::value::ComparableValue;

/// Evaluate a conditional function
pub fn eval_conditional_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    match name {
        FunctionName::If => {
            check_arity(args, 3, "IF")?;
            // Only the chosen branch is evaluated
            if evaluate(&args[0], ctx)?.ebv()? {
                evaluate(&args[1], ctx)
            } else {
                evaluate(&args[2], ctx)
            }
        }

        FunctionName::Coalesce => {
            for arg in args {
                if let Ok(value) = evaluate(arg, ctx) {
                    return Ok(value);
                }
            }
            Err(EvalError::type_error("COALESCE found no bound argument"))
        }

        _ => unreachable!(
            "Non-conditional function routed to conditional module: {:?}",
            name
        ),
    }
}
