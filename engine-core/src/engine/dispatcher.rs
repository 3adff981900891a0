//! The event dispatcher: the single-threaded run loop that ties a market
//! source, a strategy, the portfolio manager and an execution engine
//! together.
//!
//! Each iteration polls exactly one event from the source, then drains the
//! internal queue to empty before polling again, so every signal/order/fill
//! a tick produces is fully processed before the next tick of data arrives.
//! Routing is a single exhaustive match over the `Event` enum rather than a
//! virtual dispatch through trait objects — the const generic `N` on
//! [`PortfolioManager`] means the whole pipeline monomorphizes per symbol
//! count, the same way the teacher's engine monomorphized per
//! strategy/executor pair.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::core::{CancelEvent, EngineError, Event, FillEvent, MarketEvent, OrderEvent};
use crate::execution::ExecutionEngine;
use crate::portfolio::{PortfolioManager, SignalOutcome};
use crate::queue::EventQueue;

use super::traits::{MarketSource, Strategy};

/// Running counters exposed for monitoring and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatcherStats {
    pub market_events: u64,
    pub signal_events: u64,
    pub order_events: u64,
    pub fill_events: u64,
    pub cancel_events: u64,
    pub risk_rejections: u64,
    pub iterations: u64,
}

/// Ties a market source, a strategy, the portfolio manager and an execution
/// engine into one run loop.
pub struct Dispatcher<const N: usize, Src, St, Ex>
where
    Src: MarketSource,
    St: Strategy,
    Ex: ExecutionEngine,
{
    source: Src,
    strategy: St,
    execution: Ex,
    portfolio: PortfolioManager<N>,
    queue: EventQueue,
    stats: DispatcherStats,
    /// The only object the dispatcher shares across threads: a caller can
    /// flip this to pause the run loop between source polls without a
    /// channel or a lock. Ordering is `Relaxed` — pausing is advisory, not
    /// a synchronization point for any other state.
    paused: Arc<AtomicBool>,
}

impl<const N: usize, Src, St, Ex> Dispatcher<N, Src, St, Ex>
where
    Src: MarketSource,
    St: Strategy,
    Ex: ExecutionEngine,
{
    pub fn new(source: Src, strategy: St, execution: Ex, portfolio: PortfolioManager<N>, queue_capacity: usize) -> Self {
        Self {
            source,
            strategy,
            execution,
            portfolio,
            queue: EventQueue::new(queue_capacity),
            stats: DispatcherStats::default(),
            paused: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A clonable handle a caller can use to pause/resume the run loop from
    /// another thread.
    pub fn pause_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.paused)
    }

    pub fn stats(&self) -> DispatcherStats {
        self.stats
    }

    pub fn portfolio(&self) -> &PortfolioManager<N> {
        &self.portfolio
    }

    /// Run until the market source is exhausted.
    pub fn run(&mut self) -> Result<(), EngineError> {
        loop {
            if self.paused.load(Ordering::Relaxed) {
                std::thread::yield_now();
                continue;
            }

            let Some(market) = self.source.poll().map_err(EngineError::External)? else {
                debug!(iterations = self.stats.iterations, "market source exhausted, stopping run loop");
                return Ok(());
            };
            self.stats.iterations += 1;
            self.queue.push(market)?;

            while let Some(event) = self.queue.pop() {
                if let Err(err) = self.dispatch(event) {
                    self.on_error(err)?;
                }
            }
        }
    }

    /// Route one event to the component responsible for it.
    fn dispatch(&mut self, event: Event) -> Result<(), EngineError> {
        match event {
            Event::Market(market) => self.handle_market(market),
            Event::Signal(signal) => self.handle_signal(signal),
            Event::Order(order) => self.handle_order(order),
            Event::Fill(fill) => self.handle_fill(fill),
            Event::Cancel(cancel) => self.handle_cancel(cancel),
        }
    }

    fn handle_market(&mut self, market: MarketEvent) -> Result<(), EngineError> {
        self.stats.market_events += 1;
        self.execution.on_market_data(&market);
        self.portfolio.on_market_data(&market)?;
        self.strategy
            .on_market(&market, &mut self.queue)
            .map_err(EngineError::External)?;
        Ok(())
    }

    fn handle_signal(&mut self, signal: crate::core::SignalEvent) -> Result<(), EngineError> {
        self.stats.signal_events += 1;
        match self.portfolio.on_signal(&signal)? {
            SignalOutcome::Approved(order) => {
                self.queue.push(order)?;
            }
            SignalOutcome::Rejected(rejection) => {
                self.stats.risk_rejections += 1;
                warn!(?rejection, symbol = signal.symbol, "signal rejected");
            }
        }
        Ok(())
    }

    fn handle_order(&mut self, order: OrderEvent) -> Result<(), EngineError> {
        self.stats.order_events += 1;
        self.execution.submit_order(&order, &mut self.queue)?;
        Ok(())
    }

    fn handle_fill(&mut self, fill: FillEvent) -> Result<(), EngineError> {
        self.stats.fill_events += 1;
        self.portfolio.on_fill(&fill)?;
        Ok(())
    }

    fn handle_cancel(&mut self, cancel: CancelEvent) -> Result<(), EngineError> {
        self.stats.cancel_events += 1;
        // `CancelEvent` carries its own side/quantity rather than requiring
        // a lookup into the execution engine's book: an order the execution
        // engine rejects outright (no usable price, etc.) never touches its
        // own store, so there would be nothing there to find.
        let order = OrderEvent {
            order_id: cancel.order_id,
            symbol: cancel.symbol,
            timestamp: cancel.timestamp,
            side: cancel.side,
            order_type: crate::core::OrderType::Market,
            quantity: cancel.quantity,
            limit_price: 0.0,
            flags: crate::core::OrderFlags::NONE,
        };
        self.portfolio.on_cancel(&order, cancel.reason)?;
        Ok(())
    }

    /// Fatal-error hook. The default behavior is to rethrow; a caller that
    /// wants to keep running past a given error class can fork this into a
    /// custom dispatcher wrapper.
    fn on_error(&mut self, err: EngineError) -> Result<(), EngineError> {
        error!(error = %err, "dispatcher error");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderType, Side, SignalAction, SignalEvent};
    use crate::execution::SimulatedExecutionEngine;
    use crate::portfolio::RiskLimits;

    struct ScriptedSource {
        ticks: std::vec::IntoIter<f64>,
        symbol: crate::core::SymbolId,
    }

    impl ScriptedSource {
        fn new(prices: Vec<f64>) -> Self {
            Self { ticks: prices.into_iter(), symbol: 0 }
        }
    }

    impl MarketSource for ScriptedSource {
        fn poll(&mut self) -> anyhow::Result<Option<MarketEvent>> {
            Ok(self.ticks.next().map(|price| MarketEvent { symbol: self.symbol, timestamp: 0, price, volume: 1.0 }))
        }
    }

    struct BuyOnceStrategy {
        fired: bool,
    }

    impl Strategy for BuyOnceStrategy {
        fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue) -> anyhow::Result<()> {
            if !self.fired {
                self.fired = true;
                queue.push(SignalEvent {
                    symbol: event.symbol,
                    timestamp: event.timestamp,
                    action: SignalAction::Enter,
                    side: Side::Buy,
                    quantity: 10.0,
                    order_type: OrderType::Market,
                    limit_price: 0.0,
                })?;
            }
            Ok(())
        }
    }

    fn build() -> Dispatcher<1, ScriptedSource, BuyOnceStrategy, SimulatedExecutionEngine> {
        let portfolio = PortfolioManager::<1>::new(&["BTC"], 100_000.0, RiskLimits::default());
        Dispatcher::new(
            ScriptedSource::new(vec![100.0, 101.0, 102.0]),
            BuyOnceStrategy { fired: false },
            SimulatedExecutionEngine::new(64),
            portfolio,
            256,
        )
    }

    #[test]
    fn run_drains_source_and_processes_buy_signal_into_a_fill() {
        let mut dispatcher = build();
        dispatcher.run().unwrap();
        let stats = dispatcher.stats();
        assert_eq!(stats.market_events, 3);
        assert_eq!(stats.signal_events, 1);
        assert_eq!(stats.order_events, 1);
        assert_eq!(stats.fill_events, 1);
        assert_eq!(dispatcher.portfolio().position(0).unwrap().quantity, 10.0);
    }

    #[test]
    fn empty_source_completes_run_with_no_events() {
        let portfolio = PortfolioManager::<1>::new(&["BTC"], 100_000.0, RiskLimits::default());
        let mut dispatcher = Dispatcher::new(
            ScriptedSource::new(vec![]),
            BuyOnceStrategy { fired: false },
            SimulatedExecutionEngine::new(64),
            portfolio,
            256,
        );
        dispatcher.run().unwrap();
        assert_eq!(dispatcher.stats().iterations, 0);
    }

    #[test]
    fn cancel_releases_pending_quantity_even_for_an_order_execution_never_stored() {
        // Mirrors what SimulatedExecutionEngine does for a market order with
        // no usable reference price: it emits a CancelEvent without ever
        // inserting the order into its own book, so handle_cancel can't
        // recover side/quantity from a ledger lookup and must rely on the
        // CancelEvent carrying them itself.
        let mut dispatcher = build();
        dispatcher.portfolio.on_signal(&SignalEvent {
            symbol: 0,
            timestamp: 1,
            action: SignalAction::Enter,
            side: Side::Buy,
            quantity: 7.0,
            order_type: OrderType::Market,
            limit_price: 0.0,
        }).unwrap();
        assert_eq!(dispatcher.portfolio.position(0).unwrap().pending_quantity, 7.0);

        dispatcher
            .handle_cancel(crate::core::CancelEvent {
                order_id: crate::core::OrderId::new(1),
                symbol: 0,
                timestamp: 2,
                side: Side::Buy,
                quantity: 7.0,
                reason: crate::core::CancelReason::ExecutionRejected,
            })
            .unwrap();

        assert_eq!(dispatcher.portfolio.position(0).unwrap().pending_quantity, 0.0);
    }

    #[test]
    fn pause_handle_is_shared_with_the_dispatcher() {
        let dispatcher = build();
        let handle = dispatcher.pause_handle();
        handle.store(true, Ordering::Relaxed);
        assert!(dispatcher.paused.load(Ordering::Relaxed));
    }
}
