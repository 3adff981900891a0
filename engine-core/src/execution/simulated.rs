//! Instant-fill execution engine for backtesting and paper trading.
//!
//! Pessimistic by design: every order fills completely at its requested
//! price the moment it is submitted, so a strategy's backtest P&L is never
//! flattered by queue position it wouldn't actually have gotten. Market
//! orders fill at the caller-supplied reference price; limit orders fill at
//! their own limit price.
//!
//! Flag-agnostic: `order.flags` (IOC/FOK/PostOnly/ReduceOnly) is not
//! inspected here. Honoring `ReduceOnly` correctly would mean rejecting or
//! clamping a fill that would flip a position to the opposite side, but
//! that requires knowing the caller's current position, which belongs to
//! [`crate::portfolio::PortfolioManager`], not the execution engine; IOC/FOK
//! are meaningless for a backend that always fills completely and
//! immediately. A backend that rests orders in its book (rather than
//! filling on submission) is where these flags would first need enforcing.

use tracing::{debug, info};

use crate::core::{CancelReason, OrderEvent, OrderStoreError, OrderType};
use crate::queue::EventQueue;

use super::{ExecutionBase, ExecutionEngine};

pub struct SimulatedExecutionEngine {
    base: ExecutionBase,
    /// Reference price used to fill `OrderType::Market` orders when the
    /// order itself carries no price.
    last_reference_price: f64,
    fills_submitted: u64,
}

impl SimulatedExecutionEngine {
    pub fn new(ledger_capacity: usize) -> Self {
        Self {
            base: ExecutionBase::new(ledger_capacity),
            last_reference_price: 0.0,
            fills_submitted: 0,
        }
    }

    /// Update the reference price used for market orders. Called by the
    /// dispatcher on every `MarketEvent` for the relevant symbol.
    pub fn update_reference_price(&mut self, price: f64) {
        self.last_reference_price = price;
    }

    pub fn fills_submitted(&self) -> u64 {
        self.fills_submitted
    }
}

impl ExecutionEngine for SimulatedExecutionEngine {
    fn base(&self) -> &ExecutionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ExecutionBase {
        &mut self.base
    }

    fn on_market_data(&mut self, event: &crate::core::MarketEvent) {
        self.update_reference_price(event.price);
    }

    fn submit_order(&mut self, order: &OrderEvent, queue: &mut EventQueue) -> Result<(), OrderStoreError> {
        let fill_price = match order.order_type {
            OrderType::Market => self.last_reference_price,
            _ => order.limit_price,
        };

        if !(fill_price > 0.0) || !fill_price.is_finite() {
            debug!(order_id = %order.order_id, "rejecting order with no usable fill price");
            let event = crate::core::CancelEvent {
                order_id: order.order_id,
                symbol: order.symbol,
                timestamp: order.timestamp,
                side: order.side,
                quantity: order.quantity,
                reason: CancelReason::ExecutionRejected,
            };
            let _ = queue.push(event);
            return Ok(());
        }

        self.base.store.insert(order);
        info!(
            order_id = %order.order_id,
            side = %order.side,
            price = fill_price,
            quantity = order.quantity,
            "simulated fill"
        );
        self.fills_submitted += 1;
        self.emit_fill(order.order_id, order.symbol, order.side, order.quantity, fill_price, order.timestamp, queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderFlags, OrderId, Side};

    fn limit_order(id: u64, side: Side, price: f64, qty: f64) -> OrderEvent {
        OrderEvent {
            order_id: OrderId::new(id),
            symbol: 0,
            timestamp: 1,
            side,
            order_type: OrderType::Limit,
            quantity: qty,
            limit_price: price,
            flags: OrderFlags::NONE,
        }
    }

    #[test]
    fn limit_order_fills_immediately_at_its_own_price() {
        let mut engine = SimulatedExecutionEngine::new(16);
        let mut queue = EventQueue::new(16);
        engine.submit_order(&limit_order(1, Side::Buy, 100.0, 10.0), &mut queue).unwrap();

        let event = queue.pop().unwrap();
        match event {
            crate::core::Event::Fill(fill) => {
                assert_eq!(fill.fill_price, 100.0);
                assert_eq!(fill.fill_quantity, 10.0);
                assert!(fill.is_final);
            }
            other => panic!("expected fill event, got {other:?}"),
        }
    }

    #[test]
    fn market_order_fills_at_reference_price() {
        let mut engine = SimulatedExecutionEngine::new(16);
        engine.update_reference_price(250.0);
        let mut queue = EventQueue::new(16);
        let order = OrderEvent {
            order_id: OrderId::new(1),
            symbol: 0,
            timestamp: 1,
            side: Side::Sell,
            order_type: OrderType::Market,
            quantity: 5.0,
            limit_price: 0.0,
            flags: OrderFlags::NONE,
        };
        engine.submit_order(&order, &mut queue).unwrap();
        match queue.pop().unwrap() {
            crate::core::Event::Fill(fill) => assert_eq!(fill.fill_price, 250.0),
            other => panic!("expected fill event, got {other:?}"),
        }
    }

    #[test]
    fn market_order_with_no_reference_price_is_rejected() {
        let mut engine = SimulatedExecutionEngine::new(16);
        let mut queue = EventQueue::new(16);
        let order = OrderEvent {
            order_id: OrderId::new(1),
            symbol: 0,
            timestamp: 1,
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity: 5.0,
            limit_price: 0.0,
            flags: OrderFlags::NONE,
        };
        engine.submit_order(&order, &mut queue).unwrap();
        match queue.pop().unwrap() {
            crate::core::Event::Cancel(cancel) => assert_eq!(cancel.reason, CancelReason::ExecutionRejected),
            other => panic!("expected cancel event, got {other:?}"),
        }
    }

    #[test]
    fn fills_submitted_counter_increments() {
        let mut engine = SimulatedExecutionEngine::new(16);
        let mut queue = EventQueue::new(16);
        engine.submit_order(&limit_order(1, Side::Buy, 100.0, 10.0), &mut queue).unwrap();
        engine.submit_order(&limit_order(2, Side::Sell, 101.0, 5.0), &mut queue).unwrap();
        assert_eq!(engine.fills_submitted(), 2);
    }
}
