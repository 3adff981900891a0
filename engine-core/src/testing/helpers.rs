//! Test doubles for the three traits a dispatcher is generic over.
//!
//! These live behind the crate's own `testing` module (not behind
//! `#[cfg(test)]`) so downstream binaries and `tests/` integration suites
//! can script a dispatcher run without redefining the same mocks.

use std::collections::VecDeque;

use anyhow::Result;

use crate::core::{MarketEvent, OrderEvent, OrderStoreError, SignalEvent};
use crate::execution::{ExecutionBase, ExecutionEngine};
use crate::queue::EventQueue;

/// Replays a fixed script of market events, then reports exhaustion.
#[derive(Default)]
pub struct MockMarketSource {
    events: VecDeque<MarketEvent>,
}

impl MockMarketSource {
    pub fn new(events: impl IntoIterator<Item = MarketEvent>) -> Self {
        Self { events: events.into_iter().collect() }
    }
}

impl crate::engine::MarketSource for MockMarketSource {
    fn poll(&mut self) -> Result<Option<MarketEvent>> {
        Ok(self.events.pop_front())
    }
}

/// Pushes a fixed script of signals the first time it sees each matching
/// market event, in the order provided; ignores market data once the
/// script is exhausted.
#[derive(Default)]
pub struct MockStrategy {
    signals: VecDeque<SignalEvent>,
}

impl MockStrategy {
    pub fn new(signals: impl IntoIterator<Item = SignalEvent>) -> Self {
        Self { signals: signals.into_iter().collect() }
    }
}

impl crate::engine::Strategy for MockStrategy {
    fn on_market(&mut self, _event: &MarketEvent, queue: &mut EventQueue) -> Result<()> {
        if let Some(signal) = self.signals.pop_front() {
            queue.push(signal)?;
        }
        Ok(())
    }
}

/// Accepts every order into its book without ever filling or rejecting it,
/// useful for tests that only care about portfolio/risk behavior upstream
/// of execution.
pub struct MockExecutionEngine {
    base: ExecutionBase,
}

impl MockExecutionEngine {
    pub fn new(ledger_capacity: usize) -> Self {
        Self { base: ExecutionBase::new(ledger_capacity) }
    }
}

impl ExecutionEngine for MockExecutionEngine {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolId;
    use crate::engine::MarketSource;

    #[test]
    fn mock_market_source_replays_then_exhausts() {
        let mut source = MockMarketSource::new(vec![MarketEvent { symbol: 0, timestamp: 1, price: 100.0, volume: 1.0 }]);
        assert!(source.poll().unwrap().is_some());
        assert!(source.poll().unwrap().is_none());
    }

    #[test]
    fn mock_execution_engine_accepts_orders_without_filling() {
        let mut engine = MockExecutionEngine::new(16);
        let mut queue = EventQueue::new(16);
        let order = OrderEvent {
            order_id: crate::core::OrderId::new(1),
            symbol: 0 as SymbolId,
            timestamp: 1,
            side: crate::core::Side::Buy,
            order_type: crate::core::OrderType::Limit,
            quantity: 1.0,
            limit_price: 100.0,
            flags: crate::core::OrderFlags::NONE,
        };
        engine.submit_order(&order, &mut queue).unwrap();
        assert!(queue.is_empty());
        assert!(engine.get_order(order.order_id).is_some());
    }
}
