//! Runs the dispatcher against a CSV file of `timestamp,price,volume` rows
//! for a single symbol, using the same momentum strategy as the synthetic
//! demo. Useful for replaying a recorded or downloaded price series.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use engine_bins::common::{init_logging, print_stats};
use engine_bins::synthetic::MomentumStrategy;
use engine_core::core::MarketEvent;
use engine_core::engine::{Dispatcher, MarketSource};
use engine_core::execution::SimulatedExecutionEngine;
use engine_core::portfolio::{PortfolioManager, RiskLimits};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a CSV file with `timestamp,price,volume` rows and no header.
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value_t = 100_000.0)]
    starting_cash: f64,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Reads one `MarketEvent` per line of a CSV file.
struct CsvMarketSource {
    lines: std::io::Lines<BufReader<File>>,
    symbol: engine_core::core::SymbolId,
}

impl CsvMarketSource {
    fn open(path: &std::path::Path, symbol: engine_core::core::SymbolId) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Self { lines: BufReader::new(file).lines(), symbol })
    }
}

impl MarketSource for CsvMarketSource {
    fn poll(&mut self) -> Result<Option<MarketEvent>> {
        let Some(line) = self.lines.next() else { return Ok(None) };
        let line = line?;
        let mut fields = line.splitn(3, ',');
        let timestamp: i64 = fields.next().context("missing timestamp field")?.trim().parse()?;
        let price: f64 = fields.next().context("missing price field")?.trim().parse()?;
        let volume: f64 = fields.next().context("missing volume field")?.trim().parse()?;
        Ok(Some(MarketEvent { symbol: self.symbol, timestamp, price, volume }))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    tracing::info!(path = %args.input.display(), "=== CSV backtest ===");

    let source = CsvMarketSource::open(&args.input, 0)?;
    let strategy = MomentumStrategy::new(20, 30.0, 0.1);
    let execution = SimulatedExecutionEngine::new(4_096);
    let portfolio = PortfolioManager::<1>::new(&["BTC"], args.starting_cash, RiskLimits::default());

    let mut dispatcher = Dispatcher::new(source, strategy, execution, portfolio, 65_536);
    dispatcher.run()?;

    print_stats(&dispatcher.stats());

    Ok(())
}
