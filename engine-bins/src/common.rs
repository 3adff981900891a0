//! Common CLI parsing and setup shared by every demo binary.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use engine_core::engine::DispatcherStats;

/// Common CLI arguments for the demo binaries.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CommonArgs {
    /// Starting cash for the portfolio.
    #[arg(long, default_value_t = 100_000.0)]
    pub starting_cash: f64,

    /// Number of synthetic ticks to generate.
    #[arg(long, default_value_t = 1_000)]
    pub ticks: u64,

    /// Log level.
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Initialize the tracing subscriber.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
    Ok(())
}

/// Print a dispatcher run's final counters.
pub fn print_stats(stats: &DispatcherStats) {
    tracing::info!("=== Final Statistics ===");
    tracing::info!("Market events: {}", stats.market_events);
    tracing::info!("Signal events: {}", stats.signal_events);
    tracing::info!("Order events: {}", stats.order_events);
    tracing::info!("Fill events: {}", stats.fill_events);
    tracing::info!("Cancel events: {}", stats.cancel_events);
    tracing::info!("Risk rejections: {}", stats.risk_rejections);
}
