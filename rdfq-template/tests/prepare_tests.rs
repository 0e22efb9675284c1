//! Preparing parameterized query text

use pretty_assertions::assert_eq;
use rdfq_graph_ir::Term;
use rdfq_template::{ParameterizedQuery, PrepareError};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

const SYSTEM: &str = "http://example.org/app/page";

const QUERY: &str = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
                     SELECT REDUCED * WHERE {\n\
                     \t?who foaf:name ?name .\n\
                     \tFILTER (?name = ${CONCAT(\"Al\", \"ice\")})\n\
                     }\n\
                     BINDINGS $who $limit {\n\
                     \t(<http://example.org/people/alice> 10)\n\
                     }\n";

fn no_parameters() -> HashMap<String, Vec<String>> {
    HashMap::new()
}

fn parameter(name: &str, values: &[&str]) -> HashMap<String, Vec<String>> {
    let mut map = HashMap::new();
    map.insert(
        name.to_string(),
        values.iter().map(|v| v.to_string()).collect(),
    );
    map
}

fn hash_of(query: &ParameterizedQuery) -> u64 {
    let mut hasher = DefaultHasher::new();
    query.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_splits_template_and_bindings() {
    let query = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    assert!(query.template().ends_with("FILTER (?name = ${CONCAT(\"Al\", \"ice\")})\n}"));
    assert_eq!(query.binding_names().collect::<Vec<_>>(), vec!["who", "limit"]);
    assert_eq!(
        query.sample("who"),
        Some(&Term::iri("http://example.org/people/alice"))
    );
    assert_eq!(query.sample("limit"), Some(&Term::integer(10)));
}

#[test]
fn test_parse_without_bindings() {
    let text = "SELECT * WHERE { ?s ?p ?o }";
    let query = ParameterizedQuery::parse(text, SYSTEM).unwrap();
    assert_eq!(query.template(), text);
    assert_eq!(query.prepare(&no_parameters()).unwrap(), text);
}

#[test]
fn test_values_inside_group_is_not_a_table() {
    let text = "SELECT * WHERE { VALUES ?x { 1 } }";
    let query = ParameterizedQuery::parse(text, SYSTEM).unwrap();
    assert_eq!(query.binding_names().count(), 0);
}

// ============================================================================
// Preparing
// ============================================================================

#[test]
fn test_prepare_inlines_and_appends_samples() {
    let query = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    let prepared = query.prepare(&no_parameters()).unwrap();
    assert_eq!(
        prepared,
        "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
         SELECT REDUCED * WHERE {\n\
         \t?who foaf:name ?name .\n\
         \tFILTER (?name = \"Alice\")\n\
         }\n\
         BINDINGS $who $limit {\n\
         \t(<http://example.org/people/alice> 10 )\n\
         }\n"
    );
}

#[test]
fn test_runtime_values_take_the_sample_shape() {
    let query = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    let mut parameters = parameter("who", &["../people/bob", "carol"]);
    parameters.insert("limit".into(), vec!["5".into()]);

    let prepared = query.prepare(&parameters).unwrap();
    assert!(prepared.ends_with(
        "BINDINGS $who $limit {\n\
         \t(<http://example.org/people/bob> 5 )\n\
         \t(<http://example.org/app/carol> 5 )\n\
         }\n"
    ));
}

#[test]
fn test_expression_sees_parameters() {
    let query = ParameterizedQuery::parse(
        "SELECT * WHERE { ?s ?p ${STR(?who)} }\nBINDINGS $who { (<http://example.org/x>) }",
        SYSTEM,
    )
    .unwrap();
    let prepared = query.prepare(&parameter("who", &["y"])).unwrap();
    assert_eq!(
        prepared,
        "SELECT * WHERE { ?s ?p \"http://example.org/app/y\" }\n\
         BINDINGS $who {\n\t(<http://example.org/app/y> )\n}\n"
    );
}

#[test]
fn test_expression_resolves_against_system_id() {
    let query = ParameterizedQuery::new("ASK { ${IRI(\"other\")} ?p ?o }", SYSTEM, vec![], vec![]);
    assert_eq!(
        query.prepare(&no_parameters()).unwrap(),
        "ASK { <http://example.org/app/other> ?p ?o }"
    );
}

#[test]
fn test_arithmetic_filter_is_inlined() {
    let query = ParameterizedQuery::new(
        "SELECT ?x WHERE { ?x a <T> . FILTER(${1+1}) }",
        SYSTEM,
        vec![],
        vec![],
    );
    assert_eq!(
        query.prepare(&no_parameters()).unwrap(),
        "SELECT ?x WHERE { ?x a <T> . FILTER(2) }"
    );
}

#[test]
fn test_literal_text_for_iri_parameter_becomes_iri() {
    let query = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    let raw = "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>";
    let term = query.resolve_parameter("who", raw).unwrap();
    assert!(matches!(term, Term::Iri(_)));
    assert!(term.as_iri().unwrap().starts_with("http://example.org/app/"));
}

#[test]
fn test_expression_without_value() {
    let query = ParameterizedQuery::new("SELECT * { ?s ?p ${1/0} }", SYSTEM, vec![], vec![]);
    let err = query.prepare(&no_parameters()).unwrap_err();
    assert!(matches!(
        &err,
        PrepareError::MissingExpressionValue { expression } if expression == "1/0"
    ));
    assert_eq!(err.to_string(), "No value for expression: 1/0");
}

#[test]
fn test_malformed_expression() {
    let query = ParameterizedQuery::new("SELECT * { ${(} }", SYSTEM, vec![], vec![]);
    assert!(matches!(
        query.prepare(&no_parameters()),
        Err(PrepareError::Expression(_))
    ));
}

#[test]
fn test_unparseable_runtime_value() {
    let query = ParameterizedQuery::parse("SELECT * {}\nBINDINGS $x { (UNDEF) }", SYSTEM).unwrap();
    assert_eq!(query.sample("x"), None);
    assert_eq!(
        query.prepare(&no_parameters()).unwrap(),
        "SELECT * {}\nBINDINGS $x {\n\t(UNDEF )\n}\n"
    );
    assert!(matches!(
        query.prepare(&parameter("x", &["<unclosed"])),
        Err(PrepareError::UnparseableParameterValue { value }) if value == "<unclosed"
    ));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_equal_queries_hash_alike() {
    let a = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    let b = ParameterizedQuery::parse(QUERY, SYSTEM).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let other = ParameterizedQuery::parse(QUERY, "http://example.org/elsewhere").unwrap();
    assert_ne!(a, other);
}
