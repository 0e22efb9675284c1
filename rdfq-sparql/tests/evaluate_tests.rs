//! End-to-end evaluation of generated expression queries

use pretty_assertions::assert_eq;
use rdfq_graph_ir::Term;
use rdfq_sparql::{evaluate_query, write_value, QueryError};

fn value(text: &str) -> Option<Term> {
    evaluate_query(text).unwrap().first("_value").cloned()
}

// ============================================================================
// Expressions over bindings
// ============================================================================

#[test]
fn test_string_functions_over_bindings() {
    let text = "SELECT (STRLEN(CONCAT(?a, ?b)) AS ?_value) {} LIMIT 1\n\
                BINDINGS $a $b {\n\t(\"ab\" \"cde\" )\n}\n";
    assert_eq!(value(text), Some(Term::integer(5)));
}

#[test]
fn test_undef_is_unbound() {
    let text = "SELECT (IF(BOUND(?a), \"yes\", \"no\") AS ?_value) {} LIMIT 1\n\
                BINDINGS $a {\n\tUNDEF\n}\n";
    assert_eq!(value(text), Some(Term::plain("no")));
}

#[test]
fn test_first_row_wins_under_limit() {
    let text = "SELECT (?a * 10 AS ?_value) {} LIMIT 1\nVALUES ?a { 1 2 3 }";
    assert_eq!(value(text), Some(Term::integer(10)));
}

#[test]
fn test_coalesce_skips_errors() {
    assert_eq!(
        value("SELECT (COALESCE(?missing, 1/0, 3) AS ?_value) {}"),
        Some(Term::integer(3))
    );
}

// ============================================================================
// Prologue
// ============================================================================

#[test]
fn test_prefixed_cast() {
    let text = "PREFIX xsd:<http://www.w3.org/2001/XMLSchema#>\n\
                SELECT (xsd:integer(\"42\") AS ?_value) {} LIMIT 1";
    assert_eq!(value(text), Some(Term::integer(42)));
}

#[test]
fn test_iri_resolves_against_base() {
    let text = "BASE <http://example.org/a/>\nSELECT (IRI(\"b\") AS ?_value) {}";
    assert_eq!(value(text), Some(Term::iri("http://example.org/a/b")));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_evaluation_error_leaves_value_unbound() {
    let results = evaluate_query("SELECT (1/0 AS ?_value) {}").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.first("_value"), None);
}

#[test]
fn test_non_empty_group_is_rejected() {
    let err = evaluate_query("SELECT (1 AS ?x) { ?s ?p ?o }").unwrap_err();
    assert!(matches!(err, QueryError::Parse { .. }), "{err}");
}

// ============================================================================
// Serialization of results
// ============================================================================

#[test]
fn test_result_serializes_as_query_text() {
    let term = value("SELECT (\"x\\ty\" AS ?_value) {}").unwrap();
    assert_eq!(write_value(&term), "\"x\\ty\"");

    let term = value("SELECT (\"a\"@en = \"a\"@en AS ?_value) {}").unwrap();
    assert_eq!(term, Term::boolean(true));
    assert_eq!(
        write_value(&term),
        "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"
    );
}
