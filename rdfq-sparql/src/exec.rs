//! Query execution over the empty dataset
//!
//! The group pattern of every readable query is `{}`, which has exactly one
//! empty solution. Execution joins that solution with the inline data,
//! projects each row, then applies the solution modifiers.

use crate::ast::{Projection, ProjectionItem, Query};
use crate::function::{evaluate, EvalContext, XsdDateTime};
use chrono::{DateTime, FixedOffset, Utc};
use rdfq_graph_ir::Term;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::trace;

/// One row of variable bindings; an absent key is unbound
pub type Solution = FxHashMap<Arc<str>, Term>;

/// Projected solutions in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResults {
    /// Projected variable names in column order
    pub vars: Vec<Arc<str>>,
    pub solutions: Vec<Solution>,
}

impl QueryResults {
    /// Value of `var` in the first solution
    pub fn first(&self, var: &str) -> Option<&Term> {
        self.solutions.first().and_then(|row| row.get(var))
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

/// Execute a query with `NOW()` fixed to the current instant
pub fn execute(query: &Query) -> QueryResults {
    let now = XsdDateTime::from(DateTime::<FixedOffset>::from(Utc::now()));
    execute_at(query, now)
}

/// Execute a query with a given `NOW()`
pub fn execute_at(query: &Query, now: XsdDateTime) -> QueryResults {
    let input = initial_solutions(query);
    let vars = projected_vars(query);
    let base = query.prologue.base.as_deref();

    let mut solutions: Vec<Solution> = input
        .iter()
        .map(|row| project(&query.projection, row, now, base))
        .collect();

    if query.modifier.is_some() {
        solutions = distinct(solutions, &vars);
    }

    let offset = query.offset.map_or(0, |n| n as usize);
    let limit = query.limit.map_or(usize::MAX, |n| n as usize);
    let solutions = solutions.into_iter().skip(offset).take(limit).collect();

    QueryResults { vars, solutions }
}

/// The empty solution joined with the inline data
fn initial_solutions(query: &Query) -> Vec<Solution> {
    let Some(values) = &query.values else {
        return vec![Solution::default()];
    };
    values
        .rows
        .iter()
        .map(|row| {
            values
                .vars
                .iter()
                .zip(row)
                .filter_map(|(var, cell)| cell.as_ref().map(|term| (var.clone(), term.clone())))
                .collect()
        })
        .collect()
}

fn projected_vars(query: &Query) -> Vec<Arc<str>> {
    match &query.projection {
        Projection::Items(items) => items.iter().map(|item| item.name().clone()).collect(),
        Projection::Star => query
            .values
            .as_ref()
            .map(|values| values.vars.clone())
            .unwrap_or_default(),
    }
}

/// Project one row. Expressions see the columns bound before them.
fn project(
    projection: &Projection,
    row: &Solution,
    now: XsdDateTime,
    base: Option<&str>,
) -> Solution {
    let items = match projection {
        Projection::Star => return row.clone(),
        Projection::Items(items) => items,
    };

    let mut extended = row.clone();
    let mut out = Solution::default();
    for item in items {
        match item {
            ProjectionItem::Var(name) => {
                if let Some(term) = extended.get(name) {
                    out.insert(name.clone(), term.clone());
                }
            }
            ProjectionItem::Expr { expr, alias } => {
                let value = {
                    let ctx = EvalContext::new(&extended, now, base);
                    evaluate(expr, &ctx)
                };
                match value {
                    Ok(value) => {
                        let term = value.into_term();
                        extended.insert(alias.clone(), term.clone());
                        out.insert(alias.clone(), term);
                    }
                    Err(e) => trace!(var = %alias, error = %e, "projection left unbound"),
                }
            }
        }
    }
    out
}

fn distinct(solutions: Vec<Solution>, vars: &[Arc<str>]) -> Vec<Solution> {
    let mut seen: FxHashSet<Vec<Option<Term>>> = FxHashSet::default();
    solutions
        .into_iter()
        .filter(|row| seen.insert(vars.iter().map(|v| row.get(v).cloned()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_query;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> QueryResults {
        let query = parse_query(text).unwrap();
        execute_at(&query, XsdDateTime::parse("2024-05-06T07:08:09Z").unwrap())
    }

    #[test]
    fn test_expression_over_bindings() {
        let results = run("SELECT (?a + 1 AS ?_value) {} LIMIT 1\nBINDINGS $a {\n\t(41 )\n}\n");
        assert_eq!(results.vars, vec![Arc::<str>::from("_value")]);
        assert_eq!(results.first("_value"), Some(&Term::integer(42)));
    }

    #[test]
    fn test_error_leaves_projection_unbound() {
        let results = run("SELECT (?missing * 2 AS ?x) {}");
        assert_eq!(results.len(), 1);
        assert_eq!(results.first("x"), None);
    }

    #[test]
    fn test_later_projection_sees_earlier_alias() {
        let results = run("SELECT (2 AS ?a) (?a * 3 AS ?b) {}");
        assert_eq!(results.first("b"), Some(&Term::integer(6)));
    }

    #[test]
    fn test_plain_variable_after_alias() {
        let results = run("SELECT (2 AS ?a) ?a {}");
        assert_eq!(results.first("a"), Some(&Term::integer(2)));
    }

    #[test]
    fn test_distinct_offset_limit() {
        let text = "SELECT DISTINCT ?a {} OFFSET 1 LIMIT 1\nVALUES ?a { 1 1 2 3 }";
        let results = run(text);
        assert_eq!(results.len(), 1);
        assert_eq!(results.first("a"), Some(&Term::integer(2)));
    }

    #[test]
    fn test_undef_and_star() {
        let results = run("SELECT * {}\nVALUES (?a ?b) { (1 UNDEF) }");
        assert_eq!(results.vars.len(), 2);
        assert_eq!(results.first("a"), Some(&Term::integer(1)));
        assert_eq!(results.first("b"), None);
    }

    #[test]
    fn test_now_is_fixed() {
        let results = run("SELECT (YEAR(NOW()) AS ?y) {}");
        assert_eq!(results.first("y"), Some(&Term::integer(2024)));
    }
}
