//! Execution engines.
//!
//! `ExecutionEngine` plays the role the teacher gave `Executor`: the trait
//! a strategy-agnostic dispatcher talks to, with one or more concrete
//! backends behind it. Rust has no virtual base class to hang shared state
//! on, so instead every implementation owns an [`ExecutionBase`] and hands
//! it back through `base()`/`base_mut()`; the trait's default methods
//! (`emit_fill`, `emit_cancel`, `get_order`) work purely off that struct, so
//! a new backend gets order-store bookkeeping for free and only has to
//! implement `submit_order`.

pub mod simulated;

pub use simulated::SimulatedExecutionEngine;

use crate::core::{CancelEvent, CancelReason, Event, FillEvent, FillOutcome, OrderEvent, OrderId, OrderRecord, OrderStoreError};
use crate::orderbook::OrderStore;
use crate::queue::EventQueue;

/// State shared by every execution engine implementation: the resting-order
/// book plus its historical ledger.
pub struct ExecutionBase {
    pub store: OrderStore,
}

impl ExecutionBase {
    pub fn new(ledger_capacity: usize) -> Self {
        Self { store: OrderStore::new(ledger_capacity) }
    }
}

/// Backend that turns approved orders into fills and cancels.
///
/// Implementors decide *when* and *at what price* an order fills
/// (`submit_order`); the default methods here decide *how* that outcome is
/// recorded and published onto the event queue, so every backend reports
/// fills and cancels identically.
pub trait ExecutionEngine {
    fn base(&self) -> &ExecutionBase;
    fn base_mut(&mut self) -> &mut ExecutionBase;

    /// Accept a risk-approved order. Implementations may fill it
    /// immediately (as [`SimulatedExecutionEngine`] does), rest it in the
    /// book, or reject it by emitting a cancel.
    fn submit_order(&mut self, order: &OrderEvent, queue: &mut EventQueue) -> Result<(), OrderStoreError>;

    /// Called by the dispatcher on every market tick, before the strategy
    /// sees it. The default is a no-op; [`SimulatedExecutionEngine`]
    /// overrides it to track the reference price its market orders fill at.
    fn on_market_data(&mut self, _event: &crate::core::MarketEvent) {}

    fn get_order(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.base().store.get(order_id)
    }

    /// Apply a fill to a resting order and publish the resulting
    /// `FillEvent`. `fill_quantity` beyond the order's remaining quantity is
    /// silently clamped by the order store (an over-fill, not an error).
    fn emit_fill(
        &mut self,
        order_id: OrderId,
        symbol: crate::core::SymbolId,
        side: crate::core::Side,
        fill_quantity: f64,
        fill_price: f64,
        timestamp: i64,
        queue: &mut EventQueue,
    ) -> Result<(), OrderStoreError> {
        let outcome = self.base_mut().store.apply_fill(order_id, fill_quantity, timestamp)?;
        let event: Event = FillEvent {
            order_id,
            symbol,
            timestamp,
            side,
            fill_quantity,
            fill_price,
            is_final: outcome == FillOutcome::Complete,
        }
        .into();
        let _ = queue.push(event);
        Ok(())
    }

    /// Cancel a resting order and publish the resulting `CancelEvent`.
    ///
    /// `side`/`quantity` are carried on the emitted event itself (see
    /// [`CancelEvent`]) since the order may already be gone from the store
    /// by the time a consumer looks it up.
    fn emit_cancel(
        &mut self,
        order_id: OrderId,
        symbol: crate::core::SymbolId,
        side: crate::core::Side,
        quantity: f64,
        timestamp: i64,
        reason: CancelReason,
        queue: &mut EventQueue,
    ) -> Result<(), OrderStoreError> {
        self.base_mut().store.cancel(order_id, timestamp)?;
        let event: Event = CancelEvent { order_id, symbol, timestamp, side, quantity, reason }.into();
        let _ = queue.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderFlags, OrderType, Side};

    struct NoopExecutionEngine {
        base: ExecutionBase,
    }

    impl ExecutionEngine for NoopExecutionEngine {
        fn base(&self) -> &ExecutionBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ExecutionBase {
            &mut self.base
        }

        fn submit_order(&mut self, order: &OrderEvent, _queue: &mut EventQueue) -> Result<(), OrderStoreError> {
            self.base.store.insert(order);
            Ok(())
        }
    }

    fn order(id: u64) -> OrderEvent {
        OrderEvent {
            order_id: OrderId::new(id),
            symbol: 0,
            timestamp: 1,
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity: 10.0,
            limit_price: 100.0,
            flags: OrderFlags::NONE,
        }
    }

    #[test]
    fn default_emit_fill_publishes_fill_event() {
        let mut engine = NoopExecutionEngine { base: ExecutionBase::new(16) };
        let mut queue = EventQueue::new(16);
        engine.submit_order(&order(1), &mut queue).unwrap();
        engine.emit_fill(OrderId::new(1), 0, Side::Buy, 10.0, 100.0, 2, &mut queue).unwrap();
        let event = queue.pop().unwrap();
        assert_eq!(event.kind(), "fill");
    }

    #[test]
    fn default_emit_cancel_publishes_cancel_event() {
        let mut engine = NoopExecutionEngine { base: ExecutionBase::new(16) };
        let mut queue = EventQueue::new(16);
        engine.submit_order(&order(1), &mut queue).unwrap();
        engine.emit_cancel(OrderId::new(1), 0, Side::Buy, 10.0, 2, CancelReason::Requested, &mut queue).unwrap();
        let event = queue.pop().unwrap();
        assert_eq!(event.kind(), "cancel");
    }
}
