//! Numeric function implementations
//!
//! Implements arithmetic with XPath numeric promotion (integer → decimal →
//! double) and the SPARQL numeric functions ABS, ROUND, CEIL, FLOOR, RAND.

use crate::ast::{BinaryOp, Expression, FunctionName};
use crate::error::{EvalError, EvalResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::str::FromStr;

use super::eval::{evaluate, EvalContext};
use super::helpers::check_arity;
use super::value::ComparableValue;

/// Apply `+ - * /` to two numeric values.
///
/// Integer division yields a decimal.
pub fn arithmetic(
    op: BinaryOp,
    left: &ComparableValue,
    right: &ComparableValue,
) -> EvalResult<ComparableValue> {
    if !left.is_numeric() || !right.is_numeric() {
        return Err(EvalError::type_error(format!(
            "'{}' needs numeric operands, got {:?} and {:?}",
            op.as_str(),
            left,
            right
        )));
    }

    match (left, right) {
        (ComparableValue::Integer(a), ComparableValue::Integer(b)) if op != BinaryOp::Div => {
            Ok(ComparableValue::Integer(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                _ => a * b,
            }))
        }
        (ComparableValue::Double(_), _) | (_, ComparableValue::Double(_)) => {
            let (a, b) = match (left.to_f64(), right.to_f64()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(EvalError::type_error("numeric value out of double range")),
            };
            Ok(ComparableValue::Double(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                _ => a / b,
            }))
        }
        _ => {
            let (a, b) = match (left.to_decimal(), right.to_decimal()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(EvalError::type_error("expected decimal operands")),
            };
            Ok(ComparableValue::Decimal(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                _ => {
                    if b.is_zero() {
                        return Err(EvalError::DivisionByZero);
                    }
                    a / b
                }
            }))
        }
    }
}

/// Unary minus
pub fn negate(value: &ComparableValue) -> EvalResult<ComparableValue> {
    match value {
        ComparableValue::Integer(n) => Ok(ComparableValue::Integer(-n)),
        ComparableValue::Decimal(d) => Ok(ComparableValue::Decimal(-d)),
        ComparableValue::Double(d) => Ok(ComparableValue::Double(-d)),
        other => Err(EvalError::type_error(format!("cannot negate {:?}", other))),
    }
}

/// Largest integer not greater than `d`
fn floor_decimal(d: &BigDecimal) -> BigInt {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        return digits * BigInt::from(10).pow((-scale) as u32);
    }
    let divisor = BigInt::from(10).pow(scale as u32);
    let quotient = &digits / &divisor;
    if digits.is_negative() && &quotient * &divisor != digits {
        quotient - BigInt::one()
    } else {
        quotient
    }
}

fn decimal(n: BigInt) -> ComparableValue {
    ComparableValue::Decimal(BigDecimal::new(n, 0))
}

/// Evaluate a numeric function
pub fn eval_numeric_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    if name == FunctionName::Rand {
        check_arity(args, 0, "RAND")?;
        return Ok(ComparableValue::Double(rand::random::<f64>()));
    }

    check_arity(args, 1, name.as_str())?;
    let value = evaluate(&args[0], ctx)?;
    match (name, value) {
        (_, ComparableValue::Integer(n)) => Ok(ComparableValue::Integer(match name {
            FunctionName::Abs => n.abs(),
            _ => n,
        })),
        (FunctionName::Abs, ComparableValue::Decimal(d)) => Ok(ComparableValue::Decimal(d.abs())),
        (FunctionName::Floor, ComparableValue::Decimal(d)) => Ok(decimal(floor_decimal(&d))),
        (FunctionName::Ceil, ComparableValue::Decimal(d)) => Ok(decimal(-floor_decimal(&-d))),
        (FunctionName::Round, ComparableValue::Decimal(d)) => {
            let half = BigDecimal::from_str("0.5").map_err(|e| EvalError::type_error(e.to_string()))?;
            Ok(decimal(floor_decimal(&(d + half))))
        }
        (_, ComparableValue::Double(d)) => Ok(ComparableValue::Double(match name {
            FunctionName::Abs => d.abs(),
            FunctionName::Floor => d.floor(),
            FunctionName::Ceil => d.ceil(),
            _ => (d + 0.5).floor(),
        })),
        (_, other) => Err(EvalError::type_error(format!(
            "{} expects a numeric argument, got {:?}",
            name, other
        ))),
    }
}
