//! The internal event queue.
//!
//! The dispatcher's run loop polls exactly one event from the external
//! market source per iteration, then drains this queue to empty before
//! polling the source again. Everything the engine itself produces while
//! handling that one market event — signals, orders, fills, cancels —
//! lands here first, so causally-related events process in the order they
//! were generated rather than interleaving with the next tick of data.

use std::collections::VecDeque;

use crate::core::{Event, QueueError};

/// A bounded FIFO of pending events.
///
/// Bounded rather than unbounded so that a misbehaving strategy that emits
/// orders faster than the engine can drain them fails loudly (`QueueError::Full`)
/// instead of growing memory without limit.
#[derive(Debug)]
pub struct EventQueue {
    items: VecDeque<Event>,
    capacity: usize,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self { items: VecDeque::with_capacity(capacity.min(4096)), capacity }
    }

    pub fn push(&mut self, event: impl Into<Event>) -> Result<(), QueueError> {
        if self.items.len() >= self.capacity {
            return Err(QueueError::Full { capacity: self.capacity });
        }
        self.items.push_back(event.into());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(65_536)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CancelEvent, CancelReason, OrderId, Side};

    fn cancel(id: u64) -> CancelEvent {
        CancelEvent {
            order_id: OrderId::new(id),
            symbol: 0,
            timestamp: 0,
            side: Side::Buy,
            quantity: 1.0,
            reason: CancelReason::Requested,
        }
    }

    #[test]
    fn push_pop_preserves_fifo_order() {
        let mut queue = EventQueue::new(4);
        queue.push(cancel(1)).unwrap();
        queue.push(cancel(2)).unwrap();
        assert_eq!(queue.pop().unwrap().kind(), "cancel");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn push_beyond_capacity_errors() {
        let mut queue = EventQueue::new(1);
        queue.push(cancel(1)).unwrap();
        assert_eq!(queue.push(cancel(2)), Err(QueueError::Full { capacity: 1 }));
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut queue = EventQueue::new(4);
        assert!(queue.pop().is_none());
    }
}
