//! A synthetic single-symbol market source and a momentum strategy, used
//! by the demo binaries in place of a real exchange feed.

use anyhow::Result;
use rand::Rng;

use engine_core::core::{MarketEvent, OrderType, Side, SignalAction, SignalEvent, SymbolId};
use engine_core::engine::{MarketSource, Strategy};
use engine_core::queue::EventQueue;

/// Generates a bounded random walk for one symbol, one tick per `poll`.
pub struct RandomWalkSource {
    symbol: SymbolId,
    price: f64,
    ticks_remaining: u64,
    timestamp: i64,
    volatility_bps: f64,
}

impl RandomWalkSource {
    pub fn new(symbol: SymbolId, starting_price: f64, ticks: u64, volatility_bps: f64) -> Self {
        Self { symbol, price: starting_price, ticks_remaining: ticks, timestamp: 0, volatility_bps }
    }
}

impl MarketSource for RandomWalkSource {
    fn poll(&mut self) -> Result<Option<MarketEvent>> {
        if self.ticks_remaining == 0 {
            return Ok(None);
        }
        self.ticks_remaining -= 1;
        self.timestamp += 1;

        let mut rng = rand::thread_rng();
        let drift_bps: f64 = rng.gen_range(-self.volatility_bps..=self.volatility_bps);
        self.price = (self.price * (1.0 + drift_bps / 10_000.0)).max(0.01);

        Ok(Some(MarketEvent {
            symbol: self.symbol,
            timestamp: self.timestamp,
            price: self.price,
            volume: rng.gen_range(0.1..5.0),
        }))
    }
}

/// Crosses a simple moving average: buys when price moves above it by
/// `threshold_bps`, sells when it moves below. Not a realistic trading
/// strategy, just enough to drive signal/order/fill traffic for a demo.
pub struct MomentumStrategy {
    window: Vec<f64>,
    window_size: usize,
    threshold_bps: f64,
    order_quantity: f64,
    in_position: bool,
}

impl MomentumStrategy {
    pub fn new(window_size: usize, threshold_bps: f64, order_quantity: f64) -> Self {
        Self { window: Vec::with_capacity(window_size), window_size, threshold_bps, order_quantity, in_position: false }
    }

    fn moving_average(&self) -> f64 {
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }
}

impl Strategy for MomentumStrategy {
    fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue) -> Result<()> {
        if self.window.len() == self.window_size {
            self.window.remove(0);
        }
        self.window.push(event.price);
        if self.window.len() < self.window_size {
            return Ok(());
        }

        let average = self.moving_average();
        let deviation_bps = (event.price - average) / average * 10_000.0;

        if !self.in_position && deviation_bps > self.threshold_bps {
            self.in_position = true;
            queue.push(SignalEvent {
                symbol: event.symbol,
                timestamp: event.timestamp,
                action: SignalAction::Enter,
                side: Side::Buy,
                quantity: self.order_quantity,
                order_type: OrderType::Market,
                limit_price: 0.0,
            })?;
        } else if self.in_position && deviation_bps < -self.threshold_bps {
            self.in_position = false;
            queue.push(SignalEvent {
                symbol: event.symbol,
                timestamp: event.timestamp,
                action: SignalAction::Exit,
                side: Side::Sell,
                quantity: self.order_quantity,
                order_type: OrderType::Market,
                limit_price: 0.0,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_walk_source_exhausts_after_requested_ticks() {
        let mut source = RandomWalkSource::new(0, 100.0, 3, 10.0);
        assert!(source.poll().unwrap().is_some());
        assert!(source.poll().unwrap().is_some());
        assert!(source.poll().unwrap().is_some());
        assert!(source.poll().unwrap().is_none());
    }

    #[test]
    fn momentum_strategy_waits_for_a_full_window_before_signaling() {
        let mut strategy = MomentumStrategy::new(5, 50.0, 1.0);
        let mut queue = EventQueue::new(16);
        for i in 0..4 {
            strategy
                .on_market(&MarketEvent { symbol: 0, timestamp: i, price: 100.0, volume: 1.0 }, &mut queue)
                .unwrap();
        }
        assert!(queue.is_empty());
    }
}
