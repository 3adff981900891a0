//! Runs the dispatcher against a synthetic random-walk market and a
//! moving-average momentum strategy, with instant-fill simulated execution.

use anyhow::Result;
use clap::Parser;

use engine_bins::common::{init_logging, print_stats, CommonArgs};
use engine_bins::synthetic::{MomentumStrategy, RandomWalkSource};
use engine_core::engine::Dispatcher;
use engine_core::execution::SimulatedExecutionEngine;
use engine_core::portfolio::{PortfolioManager, RiskLimits};

fn main() -> Result<()> {
    let args = CommonArgs::parse();
    init_logging(&args.log_level)?;

    tracing::info!("=== Synthetic momentum backtest ===");

    let source = RandomWalkSource::new(0, 50_000.0, args.ticks, 15.0);
    let strategy = MomentumStrategy::new(20, 30.0, 0.1);
    let execution = SimulatedExecutionEngine::new(4_096);

    let mut limits = RiskLimits::default();
    limits.max_position_quantity = 5.0;
    limits.max_order_quantity = 1.0;
    let portfolio = PortfolioManager::<1>::new(&["BTC"], args.starting_cash, limits);

    let mut dispatcher = Dispatcher::new(source, strategy, execution, portfolio, 65_536);
    dispatcher.run()?;

    print_stats(&dispatcher.stats());
    let metrics = dispatcher.portfolio().compute_metrics();
    tracing::info!(
        realized_pnl = metrics.net_realized_pnl,
        unrealized_pnl = metrics.net_unrealized_pnl,
        total_value = dispatcher.portfolio().get_total_value(),
        "portfolio summary"
    );

    Ok(())
}
