//! Bounded historical ledger of terminal orders.
//!
//! A fixed-capacity ring buffer: once full, the oldest entry is evicted to
//! make room for the newest. This is deliberately not a database — it
//! exists so a strategy or report can look back over recent fills and
//! cancels without the order store growing without bound over a long run.

use std::collections::VecDeque;

use crate::core::OrderRecord;

pub struct OrderLedger {
    entries: VecDeque<OrderRecord>,
    capacity: usize,
}

impl OrderLedger {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity.min(4096)), capacity: capacity.max(1) }
    }

    pub fn push(&mut self, record: OrderRecord) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> {
        self.entries.iter()
    }

    pub fn most_recent(&self) -> Option<&OrderRecord> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderEvent, OrderFlags, OrderId, OrderType, Side};

    fn terminal_record(id: u64) -> OrderRecord {
        let event = OrderEvent {
            order_id: OrderId::new(id),
            symbol: 0,
            timestamp: 1,
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity: 1.0,
            limit_price: 100.0,
            flags: OrderFlags::NONE,
        };
        let mut record = OrderRecord::new(&event, 0);
        record.apply_fill(1.0, 2).unwrap();
        record
    }

    #[test]
    fn evicts_oldest_when_over_capacity() {
        let mut ledger = OrderLedger::new(2);
        ledger.push(terminal_record(1));
        ledger.push(terminal_record(2));
        ledger.push(terminal_record(3));
        assert_eq!(ledger.len(), 2);
        let ids: Vec<_> = ledger.iter().map(|r| r.order_id.as_u64()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn most_recent_returns_last_pushed() {
        let mut ledger = OrderLedger::new(4);
        ledger.push(terminal_record(1));
        ledger.push(terminal_record(2));
        assert_eq!(ledger.most_recent().unwrap().order_id.as_u64(), 2);
    }
}
