//! Template compilation, from structural events to query text

use pretty_assertions::assert_eq;
use rdfq_graph_ir::{Event, Node, OverrideBase, Term, Triple};
use rdfq_template::{
    compile_to_string, origins_from_query, CompileError, CompilerConfig, QueryShape,
    SparqlProducer,
};

const BASE: &str = "http://example.org/people/page";
const FOAF: &str = "http://xmlns.com/foaf/0.1/";
const DC: &str = "http://purl.org/dc/terms/";

fn reference(relative: &str, origin: &str) -> Node {
    Node::with_origin(Term::reference(BASE, relative), origin)
}

fn this() -> Node {
    reference("?this", "/1")
}

fn foaf(local: &str) -> Node {
    Node::new(Term::curie("foaf", local, FOAF))
}

fn content(origin: &str) -> Node {
    Node::with_origin(Term::plain(""), origin)
}

fn triple(subject: &Node, predicate: Node, object: &Node) -> Event {
    Event::Triple(Triple::new(subject.clone(), predicate, object.clone(), false))
}

fn document(body: Vec<Event>) -> Vec<Event> {
    let mut events = vec![Event::StartDocument, Event::namespace("foaf", FOAF)];
    events.extend(body);
    events.push(Event::EndDocument);
    events
}

fn compile(events: Vec<Event>) -> String {
    compile_to_string(events, CompilerConfig::default()).unwrap()
}

const HEADER: &str = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\nSELECT REDUCED *\n";

/// `?this knows ?friend`, with the friend's name as nested content
fn friend_events() -> Vec<Event> {
    let friend = reference("?friend", "/1/1");
    document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("knows"), &friend),
        Event::StartSubject(friend.clone()),
        triple(&friend, foaf("name"), &content("/1/1/1")),
        Event::EndSubject(friend),
        Event::EndSubject(this()),
    ])
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_mandatory_triple_left_joins_properties() {
    let topic = Node::new(Term::iri("http://example.org/T"));
    let events = document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("topic"), &topic),
        triple(&this(), foaf("name"), &content("/1/2")),
        Event::EndSubject(this()),
    ]);

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\
         \t\t<?this> foaf:topic <http://example.org/T> .\n\
         \t\tOPTIONAL {{\n\
         \t\t\t<?this> foaf:name ?_name .\n\
         \t\t}}\n\
         \t}}\n\
         }}\n\
         # @origin _name /1/2\n"
    );
    assert_eq!(compile(events), expected);
}

#[test]
fn test_repeated_predicate_alternatives() {
    let events = document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("name"), &content("/1/1")),
        triple(&this(), foaf("name"), &content("/1/2")),
        triple(&this(), foaf("name"), &content("/1/3")),
        Event::EndSubject(this()),
    ]);

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\t\t<?this> foaf:name ?_name .\n\t}}\n\
         \tUNION\n\
         \t{{\n\t\t<?this> foaf:name ?_name1 .\n\t}}\n\
         \tUNION\n\
         \t{{\n\t\t<?this> foaf:name ?_name2 .\n\t}}\n\
         }}\n\
         # @origin _name /1/1\n\
         # @origin _name1 /1/2\n\
         # @origin _name2 /1/3\n"
    );
    assert_eq!(compile(events), expected);
}

#[test]
fn test_chained_subject_is_optional() {
    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\
         \t\t<?this> foaf:knows ?friend .\n\
         \t\tOPTIONAL {{\n\
         \t\t\t?friend foaf:name ?_friend_name .\n\
         \t\t}}\n\
         \t}}\n\
         }}\n\
         # @origin friend /1/1\n\
         # @origin _friend_name /1/1/1\n"
    );
    assert_eq!(compile(friend_events()), expected);
}

#[test]
fn test_without_union_form_only_optional_brackets() {
    let config = CompilerConfig::default().with_union_form(false);
    let query = compile_to_string(friend_events(), config).unwrap();

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \tOPTIONAL {{\n\
         \t\t<?this> foaf:knows ?friend .\n\
         \t\t?friend foaf:name ?_friend_name .\n\
         \t}}\n\
         }}\n\
         # @origin friend /1/1\n\
         # @origin _friend_name /1/1/1\n"
    );
    assert_eq!(query, expected);
    assert!(!query.contains("UNION"));
}

#[test]
fn test_enclosing_content_is_promoted() {
    let friend = reference("?friend", "/1/2");
    let title = Node::new(Term::curie("dc", "title", DC));
    let events = vec![
        Event::StartDocument,
        Event::namespace("dc", DC),
        Event::namespace("foaf", FOAF),
        Event::StartSubject(this()),
        triple(&this(), foaf("knows"), &friend),
        Event::StartSubject(friend.clone()),
        triple(&friend, foaf("name"), &content("/1/2/1")),
        Event::EndSubject(friend),
        // content of the element that also holds the nested subject
        triple(&this(), title, &content("/1")),
        Event::EndSubject(this()),
        Event::EndDocument,
    ];

    let expected = "PREFIX dc: <http://purl.org/dc/terms/>\n\
                    PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
                    SELECT REDUCED *\n\
                    WHERE {\n\
                    \t{\n\
                    \t\t<?this> dc:title ?_title .\n\
                    \t}\n\
                    \tUNION\n\
                    \t{\n\
                    \t\t<?this> foaf:knows ?friend .\n\
                    \t\tOPTIONAL {\n\
                    \t\t\t?friend foaf:name ?_friend_name .\n\
                    \t\t}\n\
                    \t}\n\
                    }\n\
                    # @origin _title /1\n\
                    # @origin friend /1/2\n\
                    # @origin _friend_name /1/2/1\n";
    let query = compile(events);
    assert_eq!(query, expected);
    assert_eq!(query.matches("dc:title").count(), 1);
}

#[test]
fn test_content_equal_to_nested_origin_is_promoted() {
    let friend = reference("?friend", "/1/2");
    let title = Node::new(Term::curie("dc", "title", DC));
    let events = vec![
        Event::StartDocument,
        Event::namespace("dc", DC),
        Event::namespace("foaf", FOAF),
        Event::StartSubject(this()),
        triple(&this(), foaf("knows"), &friend),
        Event::StartSubject(friend.clone()),
        triple(&friend, foaf("name"), &content("/1/2/1")),
        Event::EndSubject(friend),
        triple(&this(), title, &content("/1/2")),
        Event::EndSubject(this()),
        Event::EndDocument,
    ];

    let query = compile(events);
    assert!(query.contains(
        "WHERE {\n\
         \t{\n\
         \t\t<?this> dc:title ?_title .\n\
         \t}\n\
         \tUNION\n\
         \t{\n\
         \t\t<?this> foaf:knows ?friend .\n"
    ));
    assert_eq!(query.matches("dc:title").count(), 1);
    assert!(query.ends_with(
        "# @origin _title /1/2\n\
         # @origin friend /1/2\n\
         # @origin _friend_name /1/2/1\n"
    ));
}

#[test]
fn test_content_without_origin_stays_in_line() {
    let friend = reference("?friend", "/1/1");
    let events = document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("knows"), &friend),
        Event::StartSubject(friend.clone()),
        triple(&friend, foaf("name"), &content("/1/1/1")),
        Event::EndSubject(friend),
        triple(&this(), foaf("title"), &Node::new(Term::plain(""))),
        Event::EndSubject(this()),
    ]);

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\
         \t\t<?this> foaf:knows ?friend .\n\
         \t\tOPTIONAL {{\n\
         \t\t\t?friend foaf:name ?_friend_name .\n\
         \t\t}}\n\
         \t}}\n\
         \tUNION\n\
         \t{{\n\
         \t\t<?this> foaf:title ?_title .\n\
         \t}}\n\
         }}\n\
         # @origin friend /1/1\n\
         # @origin _friend_name /1/1/1\n"
    );
    let query = compile(events);
    assert_eq!(query, expected);
    assert_eq!(query.matches("foaf:title").count(), 1);
}

#[test]
fn test_unrelated_subject_ends_the_open_alternative() {
    let other = reference("other", "/1/2");
    let events = document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("name"), &content("/1/1")),
        Event::StartSubject(other.clone()),
        triple(&other, foaf("name"), &content("/1/2/1")),
        Event::EndSubject(other),
        Event::EndSubject(this()),
    ]);

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\
         \t\t<?this> foaf:name ?_name .\n\
         \t}}\n\
         \tUNION\n\
         \t{{\n\
         \t\t<other> foaf:name ?_name1 .\n\
         \t}}\n\
         }}\n\
         # @origin _name /1/1\n\
         # @origin _name1 /1/2/1\n"
    );
    assert_eq!(compile(events), expected);
}

#[test]
fn test_reverse_property_chains_from_its_subject() {
    let member = Node::with_origin(Term::blank("b1"), "/1/1");
    let events = document(vec![
        Event::StartSubject(this()),
        Event::Triple(Triple::new(member.clone(), foaf("member"), this(), true)),
        Event::StartSubject(member.clone()),
        triple(&member, foaf("name"), &content("/1/1/1")),
        Event::EndSubject(member),
        Event::EndSubject(this()),
    ]);

    let expected = format!(
        "{HEADER}WHERE {{\n\
         \t{{\n\
         \t\t?_memberOf foaf:member <?this> .\n\
         \t\tOPTIONAL {{\n\
         \t\t\t?_memberOf foaf:name ?_memberOf_name .\n\
         \t\t}}\n\
         \t}}\n\
         }}\n\
         # @origin _memberOf /1/1\n\
         # @origin _memberOf_name /1/1/1\n"
    );
    assert_eq!(compile(events), expected);
}

// ============================================================================
// Query shapes and bases
// ============================================================================

#[test]
fn test_ask_and_construct_shapes() {
    let ask = compile_to_string(
        friend_events(),
        CompilerConfig::default().with_shape(QueryShape::Ask),
    )
    .unwrap();
    assert!(ask.starts_with("PREFIX foaf: <http://xmlns.com/foaf/0.1/>\nASK\nWHERE {\n"));

    let construct = compile_to_string(
        friend_events(),
        CompilerConfig::default().with_shape(QueryShape::Construct),
    )
    .unwrap();
    assert!(!construct.contains("WHERE"));
    assert!(!construct.contains("@origin"));
    assert!(construct.starts_with("PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n{\n"));
}

#[test]
fn test_override_base_rewrites_references() {
    let item = reference("item", "/1");
    let events = document(vec![
        Event::base(BASE),
        Event::StartSubject(item.clone()),
        triple(&item, foaf("name"), &content("/1/1")),
        Event::EndSubject(item),
    ]);
    let rebased = OverrideBase::new(events.into_iter(), Some(BASE), Some("http://example.org/view"));
    let query = compile_to_string(rebased, CompilerConfig::default()).unwrap();

    assert!(query.starts_with("BASE <http://example.org/view>\nPREFIX foaf:"));
    assert_eq!(query.matches("BASE").count(), 1);
    assert!(query.contains("<item> foaf:name ?_name ."));
}

// ============================================================================
// Origins and errors
// ============================================================================

#[test]
fn test_origins_survive_the_text() {
    let mut producer = SparqlProducer::new(friend_events().into_iter(), CompilerConfig::default());
    let events: Vec<Event> = producer.by_ref().collect::<Result<_, _>>().unwrap();
    let query = rdfq_template::write_query(events);

    let extracted = origins_from_query(&query);
    assert_eq!(&extracted, producer.origins());
    assert_eq!(
        extracted.iter().collect::<Vec<_>>(),
        vec![("friend", "/1/1"), ("_friend_name", "/1/1/1")]
    );
}

#[test]
fn test_invalid_variable_name_is_an_error() {
    let bad = reference("?not-valid", "/1");
    let events = document(vec![Event::StartSubject(bad.clone()), Event::EndSubject(bad)]);
    assert_eq!(
        compile_to_string(events, CompilerConfig::default()),
        Err(CompileError::GrammarViolation {
            name: "not-valid".to_string()
        })
    );
}

#[test]
fn test_pinned_literal_variable() {
    let label = Node::with_origin(Term::plain("?label"), "/1/1");
    let events = document(vec![
        Event::StartSubject(this()),
        triple(&this(), foaf("name"), &label),
        Event::EndSubject(this()),
    ]);
    let query = compile(events);
    assert!(query.contains("<?this> foaf:name ?label ."));
    assert!(query.ends_with("# @origin label /1/1\n"));
}
