//! Query text serialization
//!
//! Renders clause events as SPARQL, one tab of indentation per open bracket.

use crate::error::Result;
use crate::producer::{CompilerConfig, SparqlProducer};
use rdfq_graph_ir::{Bracket, Event, Term};
use rdfq_sparql::codec::{write_iri, write_literal};
use std::fmt::Write as _;

/// Text of a query made of `events`
pub fn write_query<I>(events: I) -> String
where
    I: IntoIterator<Item = Event>,
{
    let mut writer = QueryWriter::default();
    for event in events {
        writer.write(&event);
    }
    writer.out
}

/// Compile structural events straight to query text
pub fn compile_to_string<I>(events: I, config: CompilerConfig) -> Result<String>
where
    I: IntoIterator<Item = Event>,
{
    let compiled: Vec<Event> = SparqlProducer::new(events.into_iter(), config).collect::<Result<_>>()?;
    Ok(write_query(compiled))
}

#[derive(Default)]
struct QueryWriter {
    out: String,
    depth: usize,
}

impl QueryWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn bracket(&mut self, bracket: Bracket, opening: &str) {
        match bracket {
            Bracket::Open => {
                self.line(opening);
                self.depth += 1;
            }
            Bracket::Close => {
                self.depth = self.depth.saturating_sub(1);
                self.line("}");
            }
        }
    }

    fn write(&mut self, event: &Event) {
        match event {
            Event::Base(iri) => self.line(&format!("BASE {}", write_iri(iri))),
            Event::Namespace { prefix, iri } => {
                self.line(&format!("PREFIX {}: {}", prefix, write_iri(iri)))
            }
            Event::Select => self.line("SELECT REDUCED *"),
            Event::Ask => self.line("ASK"),
            Event::Where(bracket) => self.bracket(*bracket, "WHERE {"),
            Event::Optional(bracket) => self.bracket(*bracket, "OPTIONAL {"),
            Event::Group(bracket) => self.bracket(*bracket, "{"),
            Event::StartGraph(graph) => {
                self.bracket(Bracket::Open, &format!("GRAPH {} {{", term(graph)))
            }
            Event::EndGraph(_) => self.bracket(Bracket::Close, "}"),
            Event::Union => self.line("UNION"),
            Event::TriplePattern(tp) => self.line(&format!(
                "{} {} {} .",
                term(&tp.subject),
                term(&tp.predicate),
                term(&tp.object)
            )),
            Event::Triple(t) => self.line(&format!(
                "{} {} {} .",
                term(&t.subject.term),
                term(&t.predicate.term),
                term(&t.object.term)
            )),
            Event::Comment(text) => {
                let mut comment = String::with_capacity(text.len() + 1);
                let _ = write!(comment, "#{}", text);
                self.line(&comment);
            }
            Event::OrderBy(vars) => {
                let mut clause = String::from("ORDER BY");
                for var in vars {
                    let _ = write!(clause, " ?{}", var);
                }
                self.line(&clause);
            }
            Event::StartDocument
            | Event::EndDocument
            | Event::StartSubject(_)
            | Event::EndSubject(_) => {}
        }
    }
}

/// Query syntax for a term, keeping compact and relative forms as written
fn term(term: &Term) -> String {
    match term {
        Term::Var(name) => format!("?{}", name),
        Term::Iri(iri) => write_iri(iri),
        Term::Curie { prefix, local, .. } => format!("{}:{}", prefix, local),
        Term::Reference { relative, .. } => write_iri(relative),
        Term::Blank(id) => id.to_string(),
        Term::Literal { lexical, tag } => write_literal(lexical, tag),
    }
}
