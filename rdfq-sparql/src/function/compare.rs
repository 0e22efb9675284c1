//! Value comparison logic
//!
//! Numeric values compare across integer, decimal and double. Strings,
//! booleans and dateTimes compare within their own kind; other mixed
//! comparisons are type errors for ordering and unequal for `=`.

use crate::ast::BinaryOp;
use crate::error::{EvalError, EvalResult};
use std::cmp::Ordering;

use super::value::ComparableValue;

/// Compare two values with a comparison operator
pub fn compare_values(
    left: &ComparableValue,
    right: &ComparableValue,
    op: BinaryOp,
) -> EvalResult<bool> {
    match op {
        BinaryOp::Eq => values_equal(left, right),
        BinaryOp::Ne => values_equal(left, right).map(|eq| !eq),
        _ => Ok(match order_values(left, right)? {
            Some(ordering) => apply_ordering(ordering, op),
            // NaN is unordered
            None => false,
        }),
    }
}

/// Apply an ordering operator to an ordering result
#[inline]
pub fn apply_ordering(ordering: Ordering, op: BinaryOp) -> bool {
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => false,
    }
}

/// Numeric comparison with promotion; `None` when either side is not numeric
fn numeric_cmp(left: &ComparableValue, right: &ComparableValue) -> Option<Option<Ordering>> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    Some(match (left, right) {
        (ComparableValue::Integer(a), ComparableValue::Integer(b)) => Some(a.cmp(b)),
        (ComparableValue::Double(_), _) | (_, ComparableValue::Double(_)) => {
            left.to_f64()?.partial_cmp(&right.to_f64()?)
        }
        _ => Some(left.to_decimal()?.cmp(&right.to_decimal()?)),
    })
}

/// Ordering for `<`, `<=`, `>`, `>=`
fn order_values(left: &ComparableValue, right: &ComparableValue) -> EvalResult<Option<Ordering>> {
    if let Some(ordering) = numeric_cmp(left, right) {
        return Ok(ordering);
    }
    match (left, right) {
        (
            ComparableValue::String { value: a, lang: la },
            ComparableValue::String { value: b, lang: lb },
        ) if la == lb => Ok(Some(a.cmp(b))),
        (ComparableValue::Bool(a), ComparableValue::Bool(b)) => Ok(Some(a.cmp(b))),
        (ComparableValue::DateTime(a), ComparableValue::DateTime(b)) => {
            Ok(Some(a.instant().cmp(&b.instant())))
        }
        _ => Err(EvalError::type_error(format!(
            "cannot order {:?} and {:?}",
            left, right
        ))),
    }
}

/// Value equality for `=`, `!=` and `IN`
pub fn values_equal(left: &ComparableValue, right: &ComparableValue) -> EvalResult<bool> {
    if let Some(ordering) = numeric_cmp(left, right) {
        return Ok(ordering == Some(Ordering::Equal));
    }
    match (left, right) {
        (ComparableValue::DateTime(a), ComparableValue::DateTime(b)) => {
            Ok(a.instant() == b.instant())
        }
        (ComparableValue::Typed { .. }, ComparableValue::Typed { .. }) if left != right => Err(
            EvalError::type_error(format!("cannot compare {:?} and {:?}", left, right)),
        ),
        _ => Ok(left == right),
    }
}
