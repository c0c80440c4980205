use std::cell::RefCell;
use std::collections::VecDeque;

/// Opaque unit of pending work. Only its presence matters to the tick path.
pub type Marker = &'static str;

pub const RESPONSE_EVENT_MARKER: Marker = "on_http_response_headers";

/// FIFO of pending work shared between the stream contexts that append to it
/// and the root context that drains it on tick.
///
/// No bound is enforced: if events arrive faster than ticks, the queue grows.
/// Borrows never outlive a single method call, so the queue can be touched
/// from any hook without holding state across host calls.
#[derive(Debug, Default)]
pub struct WorkQueue {
    entries: RefCell<VecDeque<Marker>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        WorkQueue::default()
    }

    /// Appends `marker` and returns the resulting depth.
    pub fn push(&self, marker: Marker) -> usize {
        let mut entries = self.entries.borrow_mut();
        entries.push_back(marker);
        entries.len()
    }

    pub fn pop_front(&self) -> Option<Marker> {
        self.entries.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::{WorkQueue, RESPONSE_EVENT_MARKER};

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new();
        assert_eq!(queue.len(), 0);

        assert_eq!(queue.push("first"), 1);
        assert_eq!(queue.push(RESPONSE_EVENT_MARKER), 2);
        assert_eq!(queue.push("third"), 3);

        assert_eq!(queue.pop_front(), Some("first"));
        assert_eq!(queue.pop_front(), Some(RESPONSE_EVENT_MARKER));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_front(), Some("third"));
        assert_eq!(queue.pop_front(), None);
        assert_eq!(queue.len(), 0);
    }
}
