//! External interfaces the dispatcher talks to: where market data comes
//! from, and what decides what to do with it.

use anyhow::Result;

use crate::core::MarketEvent;
use crate::queue::EventQueue;

/// Supplies the one kind of event the dispatcher cannot generate itself:
/// market data. `poll` is one of the engine's two suspension points (the
/// other being the pause-yield in the run loop) — everything downstream of
/// a tick is produced synchronously from it.
pub trait MarketSource {
    /// Returns the next market event, or `Ok(None)` when the source is
    /// exhausted (end of a backtest data file, or a closed live feed).
    fn poll(&mut self) -> Result<Option<MarketEvent>>;
}

/// A trading strategy: reacts to market data by pushing `SignalEvent`s onto
/// the queue. Strategies never build `OrderEvent`s directly — that
/// translation, and the risk checks gating it, belong to the portfolio
/// manager alone.
pub trait Strategy {
    fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SignalAction, SignalEvent, Side};
    use crate::core::OrderType;

    struct AlwaysBuy;

    impl Strategy for AlwaysBuy {
        fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue) -> Result<()> {
            queue.push(SignalEvent {
                symbol: event.symbol,
                timestamp: event.timestamp,
                action: SignalAction::Enter,
                side: Side::Buy,
                quantity: 1.0,
                order_type: OrderType::Market,
                limit_price: 0.0,
            })?;
            Ok(())
        }
    }

    #[test]
    fn strategy_pushes_signal_onto_queue() {
        let mut strategy = AlwaysBuy;
        let mut queue = EventQueue::new(4);
        let market = MarketEvent { symbol: 0, timestamp: 1, price: 100.0, volume: 1.0 };
        strategy.on_market(&market, &mut queue).unwrap();
        assert_eq!(queue.pop().unwrap().kind(), "signal");
    }
}
