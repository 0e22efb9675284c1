use crate::{iri, Event, Node, Triple, TriplePattern};
use std::collections::VecDeque;
use std::sync::Arc;

/// Replaces a document's base and re-resolves every reference against it.
///
/// The new base is announced once, ahead of the first event that is not the
/// document start, a namespace or a base. A document base that resolves to
/// `from` (or any base when `from` is `None`) is replaced by the new base;
/// any other document base is passed through.
pub struct OverrideBase<I> {
    source: I,
    from: Option<Arc<str>>,
    to: Option<Arc<str>>,
    based: bool,
    pending: VecDeque<Event>,
}

impl<I> OverrideBase<I>
where
    I: Iterator<Item = Event>,
{
    pub fn new(source: I, from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            source,
            from: from.map(Arc::from),
            to: to.map(Arc::from),
            based: false,
            pending: VecDeque::new(),
        }
    }

    fn rebase(&self, node: Node) -> Node {
        match &self.to {
            Some(base) => Node {
                term: node.term.rebase(base),
                origin: node.origin,
            },
            None => node,
        }
    }

    fn process(&mut self, event: Event) {
        let announces = !matches!(
            event,
            Event::StartDocument | Event::Namespace { .. } | Event::Base(_)
        );
        if !self.based && announces {
            if let Some(base) = &self.to {
                self.pending.push_back(Event::Base(base.clone()));
            }
            self.based = true;
        }

        let event = match event {
            Event::Base(doc_base) => {
                self.based = true;
                let replaced = match &self.from {
                    None => true,
                    Some(from) => iri::resolve(from, &doc_base) == from.as_ref(),
                };
                if replaced {
                    match &self.to {
                        Some(base) => Event::Base(base.clone()),
                        None => return,
                    }
                } else {
                    Event::Base(doc_base)
                }
            }
            Event::StartSubject(node) => Event::StartSubject(self.rebase(node)),
            Event::EndSubject(node) => Event::EndSubject(self.rebase(node)),
            Event::StartGraph(term) => Event::StartGraph(self.rebase(term.into()).term),
            Event::EndGraph(term) => Event::EndGraph(self.rebase(term.into()).term),
            Event::Triple(t) => Event::Triple(Triple::new(
                self.rebase(t.subject),
                self.rebase(t.predicate),
                self.rebase(t.object),
                t.inverse,
            )),
            Event::TriplePattern(tp) => Event::TriplePattern(TriplePattern::new(
                self.rebase(tp.subject.into()).term,
                self.rebase(tp.predicate.into()).term,
                self.rebase(tp.object.into()).term,
                tp.inverse,
            )),
            other => other,
        };
        self.pending.push_back(event);
    }
}

impl<I> Iterator for OverrideBase<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        while self.pending.is_empty() {
            let event = self.source.next()?;
            self.process(event);
        }
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;
    use pretty_assertions::assert_eq;

    const OLD: &str = "http://old.example/dir/page";
    const NEW: &str = "http://new.example/app/view";

    fn subject(relative: &str) -> Node {
        Node::with_origin(Term::reference(OLD, relative), "/1")
    }

    #[test]
    fn test_matching_base_is_replaced() {
        let events = vec![
            Event::StartDocument,
            Event::namespace("foaf", "http://xmlns.com/foaf/0.1/"),
            Event::base(OLD),
            Event::StartSubject(subject("item")),
            Event::EndDocument,
        ];
        let out: Vec<Event> = OverrideBase::new(events.into_iter(), Some(OLD), Some(NEW)).collect();

        assert_eq!(out[2], Event::base(NEW));
        assert_eq!(out.iter().filter(|e| matches!(e, Event::Base(_))).count(), 1);
        match &out[3] {
            Event::StartSubject(node) => {
                assert_eq!(node.term.as_iri(), Some("http://new.example/app/item"));
                assert_eq!(node.origin.as_deref(), Some("/1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_foreign_base_is_kept() {
        let events = vec![Event::StartDocument, Event::base("http://elsewhere.example/")];
        let out: Vec<Event> = OverrideBase::new(events.into_iter(), Some(OLD), Some(NEW)).collect();
        assert_eq!(out, vec![Event::StartDocument, Event::base("http://elsewhere.example/")]);
    }

    #[test]
    fn test_base_announced_without_document_base() {
        let events = vec![Event::StartDocument, Event::StartSubject(subject("x")), Event::EndDocument];
        let out: Vec<Event> = OverrideBase::new(events.into_iter(), None, Some(NEW)).collect();
        assert_eq!(out[1], Event::base(NEW));
        assert_eq!(out.len(), 4);
    }
}
