use crate::config::FileConfig;
use crate::error::CliResult;
use crate::input;
use rdfq_graph_ir::{Event, OverrideBase};
use rdfq_template::{compile_to_string, CompilerConfig};
use std::collections::BTreeSet;
use std::path::Path;

pub fn run(
    file: Option<&Path>,
    config: &FileConfig,
    compiler: CompilerConfig,
    base: Option<&str>,
) -> CliResult<()> {
    let text = input::read_input(file)?;
    let events = input::parse_events(&text)?;
    print!("{}", render(events, config, compiler, base)?);
    Ok(())
}

/// Query text for an event stream
pub fn render(
    mut events: Vec<Event>,
    config: &FileConfig,
    compiler: CompilerConfig,
    base: Option<&str>,
) -> CliResult<String> {
    // configured namespaces fill in prefixes the document leaves undeclared
    let declared: BTreeSet<&str> = events
        .iter()
        .filter_map(|e| match e {
            Event::Namespace { prefix, .. } => Some(prefix.as_ref()),
            _ => None,
        })
        .collect();
    let defaults: Vec<Event> = config
        .prefixes
        .iter()
        .filter(|(prefix, _)| !declared.contains(prefix.as_str()))
        .map(|(prefix, iri)| Event::namespace(prefix, iri))
        .collect();
    if !defaults.is_empty() {
        let at = events
            .iter()
            .position(|e| matches!(e, Event::StartDocument))
            .map_or(0, |i| i + 1);
        let tail = events.split_off(at);
        events.extend(defaults);
        events.extend(tail);
    }

    tracing::info!(events = events.len(), shape = ?compiler.shape, "compiling template");
    let query = match base {
        Some(base) => {
            let rebased = OverrideBase::new(events.into_iter(), None, Some(base));
            compile_to_string(rebased, compiler)?
        }
        None => compile_to_string(events, compiler)?,
    };
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfq_graph_ir::{Node, Term, Triple};
    use std::collections::BTreeMap;

    fn events() -> Vec<Event> {
        let this = Node::with_origin(Term::reference("http://example.org/", "?this"), "/1");
        let name = Node::with_origin(Term::plain(""), "/1/1");
        let predicate = Node::new(Term::curie("foaf", "name", "http://xmlns.com/foaf/0.1/"));
        vec![
            Event::StartDocument,
            Event::StartSubject(this.clone()),
            Event::Triple(Triple::new(this.clone(), predicate, name, false)),
            Event::EndSubject(this),
            Event::EndDocument,
        ]
    }

    #[test]
    fn test_configured_prefixes_are_declared() {
        let config = FileConfig {
            prefixes: BTreeMap::from([("foaf".to_string(), "http://xmlns.com/foaf/0.1/".to_string())]),
            ..FileConfig::default()
        };
        let query = render(events(), &config, CompilerConfig::default(), None).unwrap();
        assert!(query.starts_with("PREFIX foaf: <http://xmlns.com/foaf/0.1/>\nSELECT REDUCED *\n"));
    }

    #[test]
    fn test_document_prefix_overrides_configured_one() {
        let config = FileConfig {
            prefixes: BTreeMap::from([
                ("foaf".to_string(), "http://example.org/not-foaf/".to_string()),
                ("dc".to_string(), "http://purl.org/dc/terms/".to_string()),
            ]),
            ..FileConfig::default()
        };
        let mut events = events();
        events.insert(1, Event::namespace("foaf", "http://xmlns.com/foaf/0.1/"));
        let query = render(events, &config, CompilerConfig::default(), None).unwrap();
        assert!(query.starts_with(
            "PREFIX dc: <http://purl.org/dc/terms/>\n\
             PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
             SELECT REDUCED *\n"
        ));
        assert!(!query.contains("not-foaf"));
    }

    #[test]
    fn test_base_flag_is_announced() {
        let query = render(
            events(),
            &FileConfig::default(),
            CompilerConfig::default(),
            Some("http://example.org/view"),
        )
        .unwrap();
        assert!(query.starts_with("BASE <http://example.org/view>\nSELECT"));
    }
}
