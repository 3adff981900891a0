//! Order lifecycle state machine.
//!
//! The full typestate treatment the teacher used for cache-line order
//! structs doesn't fit here: the order store needs to hold orders of every
//! status in one homogeneous table, indexable by id. So the lifecycle is a
//! plain `OrderStatus` enum plus validated mutations on `OrderRecord`,
//! rather than a distinct Rust type per state.
//!
//! ```text
//! New ──▶ PartiallyFilled ──▶ Filled
//!  │             │
//!  └─────────────┴──▶ Cancelled
//! ```

use super::errors::OrderStoreError;
use super::event::OrderEvent;
use super::types::{OrderId, OrderType, Side, SymbolId};

/// Where an order sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    #[inline]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

/// Outcome of applying a fill to an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Order still has remaining quantity.
    Partial,
    /// Order's remaining quantity reached zero.
    Complete,
}

/// A resting order tracked by the order store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub symbol: SymbolId,
    pub side: Side,
    pub order_type: OrderType,
    pub limit_price: f64,
    pub quantity: f64,
    pub filled_quantity: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
    /// Insertion sequence number, used to break price-time ties when two
    /// orders land at the same price and the same timestamp.
    pub sequence: u64,
}

impl OrderRecord {
    pub fn new(order: &OrderEvent, sequence: u64) -> Self {
        Self {
            order_id: order.order_id,
            symbol: order.symbol,
            side: order.side,
            order_type: order.order_type,
            limit_price: order.limit_price,
            quantity: order.quantity,
            filled_quantity: 0.0,
            status: OrderStatus::New,
            created_at: order.timestamp,
            updated_at: order.timestamp,
            sequence,
        }
    }

    #[inline]
    pub fn remaining_quantity(&self) -> f64 {
        (self.quantity - self.filled_quantity).max(0.0)
    }

    /// Apply a fill of `fill_quantity` at `timestamp`.
    ///
    /// Returns an error if the order is already terminal or the fill
    /// quantity is non-positive; over-fills are clamped to the remaining
    /// quantity rather than rejected, per the engine's over-fill policy,
    /// and the caller is expected to log the clamp.
    pub fn apply_fill(&mut self, fill_quantity: f64, timestamp: i64) -> Result<FillOutcome, OrderStoreError> {
        if self.status.is_terminal() {
            return Err(OrderStoreError::AlreadyTerminal(self.order_id));
        }
        if !(fill_quantity > 0.0) || !fill_quantity.is_finite() {
            return Err(OrderStoreError::InvalidInput(format!(
                "fill quantity must be positive and finite, got {fill_quantity}"
            )));
        }

        let applied = fill_quantity.min(self.remaining_quantity());
        self.filled_quantity += applied;
        self.updated_at = timestamp;

        if self.remaining_quantity() <= f64::EPSILON {
            self.status = OrderStatus::Filled;
            Ok(FillOutcome::Complete)
        } else {
            self.status = OrderStatus::PartiallyFilled;
            Ok(FillOutcome::Partial)
        }
    }

    pub fn cancel(&mut self, timestamp: i64) -> Result<(), OrderStoreError> {
        if self.status.is_terminal() {
            return Err(OrderStoreError::AlreadyTerminal(self.order_id));
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = timestamp;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::OrderFlags;

    fn sample_order(order_id: u64, quantity: f64) -> OrderEvent {
        OrderEvent {
            order_id: OrderId::new(order_id),
            symbol: 0,
            timestamp: 1_000,
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity,
            limit_price: 100.0,
            flags: OrderFlags::NONE,
        }
    }

    #[test]
    fn new_order_starts_in_new_status() {
        let record = OrderRecord::new(&sample_order(1, 10.0), 0);
        assert_eq!(record.status, OrderStatus::New);
        assert_eq!(record.remaining_quantity(), 10.0);
    }

    #[test]
    fn partial_fill_transitions_to_partially_filled() {
        let mut record = OrderRecord::new(&sample_order(1, 10.0), 0);
        let outcome = record.apply_fill(4.0, 1_001).unwrap();
        assert_eq!(outcome, FillOutcome::Partial);
        assert_eq!(record.status, OrderStatus::PartiallyFilled);
        assert_eq!(record.remaining_quantity(), 6.0);
    }

    #[test]
    fn full_fill_transitions_to_filled() {
        let mut record = OrderRecord::new(&sample_order(1, 10.0), 0);
        let outcome = record.apply_fill(10.0, 1_001).unwrap();
        assert_eq!(outcome, FillOutcome::Complete);
        assert_eq!(record.status, OrderStatus::Filled);
    }

    #[test]
    fn over_fill_is_clamped_not_rejected() {
        let mut record = OrderRecord::new(&sample_order(1, 10.0), 0);
        let outcome = record.apply_fill(15.0, 1_001).unwrap();
        assert_eq!(outcome, FillOutcome::Complete);
        assert_eq!(record.filled_quantity, 10.0);
    }

    #[test]
    fn fill_after_terminal_is_an_error() {
        let mut record = OrderRecord::new(&sample_order(1, 10.0), 0);
        record.cancel(1_001).unwrap();
        let err = record.apply_fill(1.0, 1_002).unwrap_err();
        assert_eq!(err, OrderStoreError::AlreadyTerminal(OrderId::new(1)));
    }

    #[test]
    fn cancel_after_terminal_is_an_error() {
        let mut record = OrderRecord::new(&sample_order(1, 10.0), 0);
        record.apply_fill(10.0, 1_001).unwrap();
        assert_eq!(record.cancel(1_002), Err(OrderStoreError::AlreadyTerminal(OrderId::new(1))));
    }
}
