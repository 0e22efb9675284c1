//! Look-ahead over an event source
//!
//! [`EventBuffer`] pulls from the underlying iterator only as far as the
//! deepest `peek` asked for. Peeked events are buffered, never re-fetched.

use crate::Event;
use std::collections::VecDeque;

/// Buffered event reader with unbounded peek
pub struct EventBuffer<I> {
    source: I,
    buffer: VecDeque<Event>,
    exhausted: bool,
}

impl<I> EventBuffer<I>
where
    I: Iterator<Item = Event>,
{
    pub fn new(source: I) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fill(&mut self, len: usize) {
        while self.buffer.len() < len && !self.exhausted {
            match self.source.next() {
                Some(event) => self.buffer.push_back(event),
                None => self.exhausted = true,
            }
        }
    }

    /// The event `offset` positions ahead of the next one to be read
    pub fn peek(&mut self, offset: usize) -> Option<&Event> {
        self.fill(offset + 1);
        self.buffer.get(offset)
    }

    /// Number of events currently held
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl<I> Iterator for EventBuffer<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.fill(1);
        self.buffer.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_is_lazy_and_stable() {
        let events = vec![Event::StartDocument, Event::Union, Event::EndDocument];
        let mut reader = EventBuffer::new(events.into_iter());
        assert_eq!(reader.buffered(), 0);

        assert_eq!(reader.peek(1), Some(&Event::Union));
        assert_eq!(reader.buffered(), 2);
        assert_eq!(reader.peek(1), Some(&Event::Union));
        assert_eq!(reader.buffered(), 2);

        assert_eq!(reader.next(), Some(Event::StartDocument));
        assert_eq!(reader.peek(0), Some(&Event::Union));
        assert_eq!(reader.peek(5), None);
        assert_eq!(reader.next(), Some(Event::Union));
        assert_eq!(reader.next(), Some(Event::EndDocument));
        assert_eq!(reader.next(), None);
    }
}
