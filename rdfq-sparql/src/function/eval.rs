//! Core expression evaluation
//!
//! `evaluate` reduces an expression to a [`ComparableValue`] against one
//! solution. Errors follow SPARQL semantics: `||` and `&&` can absorb an
//! error from one side, everything else propagates it.

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::error::{EvalError, EvalResult};
use crate::exec::Solution;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::sync::Arc;

use super::compare::{compare_values, values_equal};
use super::datetime::XsdDateTime;
use super::numeric::{arithmetic, negate};
use super::cast::cast;
use super::value::ComparableValue;

/// Per-solution evaluation state
pub struct EvalContext<'a> {
    row: &'a Solution,
    now: XsdDateTime,
    base: Option<&'a str>,
    /// `BNODE(str)` labels, stable within one solution
    bnodes: RefCell<FxHashMap<Arc<str>, Arc<str>>>,
}

impl<'a> EvalContext<'a> {
    /// `now` is fixed for the whole query so every `NOW()` agrees.
    pub fn new(row: &'a Solution, now: XsdDateTime, base: Option<&'a str>) -> Self {
        Self {
            row,
            now,
            base,
            bnodes: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn row(&self) -> &Solution {
        self.row
    }

    pub fn now(&self) -> XsdDateTime {
        self.now
    }

    pub fn base(&self) -> Option<&str> {
        self.base
    }

    /// Blank node label for `BNODE(key)`
    pub fn bnode_for(&self, key: &Arc<str>) -> Arc<str> {
        self.bnodes
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| Arc::from(super::uuid::fresh_label()))
            .clone()
    }
}

/// Evaluate an expression to its value.
pub fn evaluate(expr: &Expression, ctx: &EvalContext<'_>) -> EvalResult<ComparableValue> {
    match expr {
        Expression::Var(name) => ctx
            .row()
            .get(name)
            .and_then(ComparableValue::from_term)
            .ok_or_else(|| EvalError::Unbound(name.to_string())),

        Expression::Term(term) => ComparableValue::from_term(term)
            .ok_or_else(|| EvalError::Unbound(term.string_value())),

        Expression::Binary { op, left, right } => match op {
            BinaryOp::Or | BinaryOp::And => {
                let l = evaluate(left, ctx).and_then(|v| v.ebv());
                let r = evaluate(right, ctx).and_then(|v| v.ebv());
                logical(*op, l, r).map(ComparableValue::Bool)
            }
            op if op.is_comparison() => {
                let l = evaluate(left, ctx)?;
                let r = evaluate(right, ctx)?;
                compare_values(&l, &r, *op).map(ComparableValue::Bool)
            }
            op => {
                let l = evaluate(left, ctx)?;
                let r = evaluate(right, ctx)?;
                arithmetic(*op, &l, &r)
            }
        },

        Expression::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            match op {
                UnaryOp::Not => Ok(ComparableValue::Bool(!value.ebv()?)),
                UnaryOp::Neg => negate(&value),
                UnaryOp::Pos if value.is_numeric() => Ok(value),
                UnaryOp::Pos => Err(EvalError::type_error("unary + on a non-numeric value")),
            }
        }

        Expression::Call { function, args } => function.eval(args, ctx),

        Expression::Cast { datatype, arg } => cast(datatype, evaluate(arg, ctx)?),

        Expression::In {
            expr: test,
            list,
            negated,
        } => {
            let needle = evaluate(test, ctx)?;
            let mut error = None;
            for item in list {
                match evaluate(item, ctx).and_then(|v| values_equal(&needle, &v)) {
                    Ok(true) => return Ok(ComparableValue::Bool(!negated)),
                    Ok(false) => {}
                    Err(e) => error = Some(e),
                }
            }
            match error {
                Some(e) => Err(e),
                None => Ok(ComparableValue::Bool(*negated)),
            }
        }

        // The empty group has exactly one solution
        Expression::Exists { negated } => Ok(ComparableValue::Bool(!negated)),
    }
}

/// Three-valued `||` / `&&`
fn logical(op: BinaryOp, left: EvalResult<bool>, right: EvalResult<bool>) -> EvalResult<bool> {
    let decisive = op == BinaryOp::Or;
    match (left, right) {
        (Ok(l), _) if l == decisive => Ok(decisive),
        (_, Ok(r)) if r == decisive => Ok(decisive),
        (Ok(_), Ok(_)) => Ok(!decisive),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}
