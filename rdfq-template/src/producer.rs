//! Clause compiler
//!
//! [`SparqlProducer`] turns a template's structural events into the clause
//! events of a SPARQL query. Triples whose far end is fixed are mandatory
//! and are joined at the top of their subject's block; triples whose far end
//! resolves to a variable are optional and become alternatives of a UNION
//! inside an OPTIONAL, so each template property binds independently.
//!
//! The producer is a single forward pass. Decisions that depend on what is
//! still to come (mandatory triples, whether an optional triple stands alone,
//! literal properties that must be brought forward) are made by peeking into
//! an [`EventBuffer`].

use crate::context::{Clause, Context};
use crate::error::Result;
use crate::origins::OriginTable;
use crate::resolver::TermResolver;
use rdfq_graph_ir::{Bracket, Event, EventBuffer, Node, Term, Triple, TriplePattern};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// Query form wrapped around the compiled patterns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryShape {
    #[default]
    Select,
    Ask,
    /// Patterns only; the caller supplies the `WHERE` clause
    Construct,
}

/// Compiler settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub shape: QueryShape,
    /// Render alternatives as `{ } UNION { }`; otherwise as nested `OPTIONAL`s
    pub union_form: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            shape: QueryShape::Select,
            union_form: true,
        }
    }
}

impl CompilerConfig {
    pub fn with_shape(mut self, shape: QueryShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_union_form(mut self, union_form: bool) -> Self {
        self.union_form = union_form;
        self
    }
}

/// Compile a whole event stream
pub fn compile<I>(events: I, config: CompilerConfig) -> Result<Vec<Event>>
where
    I: IntoIterator<Item = Event>,
{
    SparqlProducer::new(events.into_iter(), config).collect()
}

/// Streaming clause compiler over structural events
pub struct SparqlProducer<I> {
    reader: EventBuffer<I>,
    session: Session,
    done: bool,
}

impl<I> SparqlProducer<I>
where
    I: Iterator<Item = Event>,
{
    pub fn new(source: I, config: CompilerConfig) -> Self {
        Self {
            reader: EventBuffer::new(source),
            session: Session::new(config),
            done: false,
        }
    }

    /// Origins captured so far, in capture order
    pub fn origins(&self) -> &OriginTable {
        self.session.resolver.origins()
    }
}

impl<I> Iterator for SparqlProducer<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.session.output.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            match self.reader.next() {
                Some(event) => {
                    if let Err(e) = self.session.process(event, &mut self.reader) {
                        debug!(error = %e, "template compilation failed");
                        self.session.output.clear();
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                None => self.done = true,
            }
        }
    }
}

/// Mutable state of one compilation
struct Session {
    config: CompilerConfig,
    resolver: TermResolver,
    stack: Vec<Context>,
    /// Next group is the first alternative of its union
    initial: bool,
    /// Most recently emitted pattern
    previous: Option<TriplePattern>,
    /// Processing a promoted triple; look-ahead is off
    out_of_line: bool,
    output: VecDeque<Event>,
}

impl Session {
    fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            resolver: TermResolver::new(),
            stack: Vec::new(),
            initial: true,
            previous: None,
            out_of_line: false,
            output: VecDeque::new(),
        }
    }

    fn emit(&mut self, event: Event) {
        self.output.push_back(event);
    }

    fn process<I>(&mut self, event: Event, reader: &mut EventBuffer<I>) -> Result<()>
    where
        I: Iterator<Item = Event>,
    {
        match event {
            Event::StartDocument => self.start_document(reader),
            Event::EndDocument => self.end_document(),
            Event::StartSubject(node) => self.start_subject(&node, reader)?,
            Event::Triple(triple) => self.triple(&triple, reader)?,
            Event::EndSubject(_) => self.end_subject(),
            other => trace!(event = ?other, "event not compiled"),
        }
        Ok(())
    }

    fn start_document<I>(&mut self, reader: &mut EventBuffer<I>)
    where
        I: Iterator<Item = Event>,
    {
        self.emit(Event::StartDocument);

        let mut offset = 0;
        while let Some(event) = reader.peek(offset) {
            offset += 1;
            if event.is_start() || event.is_end() {
                break;
            }
            if let Event::Base(_) = event {
                let event = event.clone();
                self.emit(event);
            }
        }

        // every declaration, in document order; a later PREFIX overrides
        let mut offset = 0;
        while let Some(event) = reader.peek(offset) {
            offset += 1;
            match event {
                Event::Namespace { .. } => {
                    let event = event.clone();
                    self.emit(event);
                }
                Event::EndDocument => break,
                _ => {}
            }
        }

        match self.config.shape {
            QueryShape::Select => {
                self.emit(Event::Select);
                self.emit(Event::Where(Bracket::Open));
            }
            QueryShape::Ask => {
                self.emit(Event::Ask);
                self.emit(Event::Where(Bracket::Open));
            }
            QueryShape::Construct => {}
        }
    }

    fn end_document(&mut self) {
        while !self.stack.is_empty() {
            self.close();
        }
        if self.config.shape != QueryShape::Construct {
            self.emit(Event::Where(Bracket::Close));
            let comments: Vec<Event> = self
                .resolver
                .origins()
                .iter()
                .map(|(var, origin)| Event::comment(format!(" @origin {} {}", var, origin)))
                .collect();
            self.output.extend(comments);
        }
        self.emit(Event::EndDocument);
    }

    fn start_subject<I>(&mut self, node: &Node, reader: &mut EventBuffer<I>) -> Result<()>
    where
        I: Iterator<Item = Event>,
    {
        let subject = self.resolver.resolve(node, None, true)?;
        let context = self.context();

        // a subject that does not continue the last pattern ends the dangling group
        if context.is_group() && !context.has_subject() && !self.chained(&subject) {
            self.close();
        }

        self.open(Clause::Block, Some(subject.clone()));
        self.add_mandatory_triples(reader)?;

        // a chained subject's own properties are left-joined
        if !self.top_is_union() && self.chained(&subject) && !self.singleton(reader)? {
            self.open(Clause::Optional, None);
        }

        self.previous = None;
        self.promote(reader)
    }

    /// Triples may arrive out of line, so this must not peek unless
    /// `singleton` allows it.
    fn triple<I>(&mut self, triple: &Triple, reader: &mut EventBuffer<I>) -> Result<()>
    where
        I: Iterator<Item = Event>,
    {
        if self.resolver.is_promoted(triple) {
            return Ok(());
        }

        let subject = self.resolver.resolve(&triple.subject, Some(triple), true)?;
        let object = self.resolver.resolve(&triple.object, Some(triple), true)?;
        let optional = self.resolver.is_optional(triple)?;
        let pattern = TriplePattern::new(
            subject,
            triple.predicate.term.clone(),
            object,
            triple.inverse,
        );

        let context = self.context();
        if !context.union && !self.initial && context.is_group() && !context.has_subject() {
            self.close();
        }

        if optional {
            if !self.top_is_union() && self.config.union_form {
                self.open(Clause::Optional, None);
            }

            let in_optional = self.stack.last().is_some_and(Context::is_optional);
            let lone = self.initial && self.singleton(reader)?;
            if !lone || !in_optional {
                self.open(Clause::Group, None);
            }

            self.emit(Event::TriplePattern(pattern.clone()));
            self.initial = false;
            self.previous = Some(pattern);
        }
        Ok(())
    }

    fn end_subject(&mut self) {
        while self.stack.last().is_some_and(|c| !c.has_subject()) {
            self.close();
        }
        self.close();
    }

    /// Emit the subject's mandatory triples ahead of everything else
    fn add_mandatory_triples<I>(&mut self, reader: &mut EventBuffer<I>) -> Result<()>
    where
        I: Iterator<Item = Event>,
    {
        let mut offset = 0;
        let mut depth = 0i32;
        while depth >= 0 {
            let Some(event) = reader.peek(offset) else {
                break;
            };
            offset += 1;
            match event {
                Event::StartSubject(_) => depth += 1,
                Event::EndSubject(_) => depth -= 1,
                Event::Triple(triple) if depth == 0 => {
                    let triple = triple.clone();
                    if self.resolver.is_optional(&triple)? {
                        continue;
                    }
                    let subject = self.resolver.resolve(&triple.subject, Some(&triple), true)?;
                    let object = self.resolver.resolve(&triple.object, Some(&triple), true)?;
                    if self.top_is_union() {
                        self.open(Clause::Group, None);
                    }
                    let pattern = TriplePattern::new(
                        subject,
                        triple.predicate.term.clone(),
                        object,
                        triple.inverse,
                    );
                    self.emit(Event::TriplePattern(pattern.clone()));
                    self.previous = Some(pattern);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Whether no optional triple or nested subject follows in this subject
    fn singleton<I>(&mut self, reader: &mut EventBuffer<I>) -> Result<bool>
    where
        I: Iterator<Item = Event>,
    {
        if self.out_of_line {
            return Ok(false);
        }
        let mut singleton = true;
        let mut offset = 0;
        let mut depth = 0i32;
        while depth >= 0 && singleton {
            let Some(event) = reader.peek(offset) else {
                break;
            };
            offset += 1;
            match event {
                Event::StartSubject(_) => {
                    singleton = false;
                    depth += 1;
                }
                Event::EndSubject(_) => depth -= 1,
                Event::Triple(triple) if depth == 0 => {
                    let triple = triple.clone();
                    singleton = !self.resolver.is_optional(&triple)?;
                }
                _ => {}
            }
        }
        Ok(singleton)
    }

    /// Bring forward literal properties written on an enclosing element.
    ///
    /// An element carrying both content and nested subjects yields its
    /// literal triple after those subjects; it is processed here, before
    /// them, and skipped when it is reached.
    fn promote<I>(&mut self, reader: &mut EventBuffer<I>) -> Result<()>
    where
        I: Iterator<Item = Event>,
    {
        let mut queue = Vec::new();
        let mut reference: Option<Arc<str>> = None;
        let mut offset = 0;
        let mut depth = 0i32;
        while let Some(event) = reader.peek(offset) {
            offset += 1;
            match event {
                Event::StartSubject(node) => {
                    depth += 1;
                    if reference.is_none() {
                        reference = Some(Arc::from(node.primary_origin().unwrap_or("")));
                    }
                }
                Event::EndSubject(_) => depth -= 1,
                Event::Triple(triple) if depth == 0 => {
                    let object = &triple.object;
                    let Some(origin) = object.primary_origin() else {
                        continue;
                    };
                    if let Some(reference) = &reference {
                        if object.term.is_literal() && reference.starts_with(origin) {
                            queue.push(triple.clone());
                        }
                    }
                }
                _ => {}
            }
            if depth < 0 || matches!(event, Event::EndDocument) {
                break;
            }
        }

        self.out_of_line = true;
        let result = queue
            .iter()
            .try_for_each(|triple| self.triple(triple, reader));
        self.out_of_line = false;
        result
    }

    /// Top of the stack, opening the outermost block when there is none
    fn context(&mut self) -> Context {
        if self.stack.is_empty() {
            self.open(Clause::Block, None);
            if let Some(outer) = self.stack.last_mut() {
                outer.union = true;
            }
        }
        self.stack.last().cloned().unwrap_or_default()
    }

    fn top_is_union(&self) -> bool {
        self.stack.last().is_some_and(|c| c.union)
    }

    fn chained(&self, subject: &Term) -> bool {
        self.previous.as_ref().is_some_and(|previous| {
            subject == previous.partner()
                || (subject == previous.about() && !previous.partner().is_var())
        })
    }

    fn open(&mut self, clause: Clause, subject: Option<Term>) {
        let parent_union = self.top_is_union();
        let mut union = parent_union;
        match clause {
            Clause::Optional if self.config.union_form => {
                self.emit(Event::Optional(Bracket::Open));
                // first alternative inside the optional
                union = true;
            }
            Clause::Group => {
                if parent_union && !self.initial && self.config.union_form {
                    self.emit(Event::Union);
                }
                self.emit(if self.config.union_form {
                    Event::Group(Bracket::Open)
                } else {
                    Event::Optional(Bracket::Open)
                });
                union = false;
            }
            _ => {}
        }
        if let Some(subject) = &subject {
            self.emit(Event::StartSubject(Node::new(subject.clone())));
        }
        if clause != Clause::Block {
            self.initial = true;
        }
        trace!(?clause, union, depth = self.stack.len(), "open");
        self.stack.push(Context::new(clause, subject, union));
    }

    fn close(&mut self) {
        let Some(context) = self.stack.pop() else {
            return;
        };
        if let Some(subject) = &context.subject {
            self.emit(Event::EndSubject(Node::new(subject.clone())));
        }
        match context.clause {
            Clause::Optional if self.config.union_form => {
                self.emit(Event::Optional(Bracket::Close))
            }
            Clause::Group if self.config.union_form => self.emit(Event::Group(Bracket::Close)),
            Clause::Group => self.emit(Event::Optional(Bracket::Close)),
            _ => {}
        }
        if !context.is_block() {
            self.previous = None;
        }
        // closing the first alternative means the next one needs UNION
        if self.top_is_union() {
            self.initial &= !context.is_group();
        }
        trace!(clause = ?context.clause, depth = self.stack.len(), "close");
    }
}
