//! An event-driven backtesting and trading engine core.
//!
//! The engine is organized the way the dispatcher drives it: market data
//! comes in through a [`engine::MarketSource`], a [`engine::Strategy`]
//! reacts to it by pushing signals, the [`portfolio`] module turns approved
//! signals into orders and tracks positions/cash/risk, and an
//! [`execution::ExecutionEngine`] turns orders into fills. Everything in
//! between flows through one [`queue::EventQueue`] as a tagged-union
//! [`core::Event`], dispatched by a single exhaustive match rather than
//! virtual calls.
//!
//! ## Modules
//! - [`core`]: event types, order identifiers, the order lifecycle state
//!   machine, and the error taxonomy.
//! - [`queue`]: the bounded FIFO every event passes through.
//! - [`orderbook`]: the price-time priority order store and its historical
//!   ledger.
//! - [`execution`]: execution engine backends (currently: instant-fill
//!   simulation).
//! - [`portfolio`]: position accounting, cash, and pre-trade risk checks.
//! - [`engine`]: the dispatcher run loop and the `MarketSource`/`Strategy`
//!   traits it talks to.
//! - [`config`]: runtime configuration loading.
//! - [`testing`]: shared mocks for downstream integration tests.

pub mod config;
pub mod core;
pub mod engine;
pub mod execution;
pub mod orderbook;
pub mod portfolio;
pub mod queue;
pub mod testing;
pub mod utils;

pub use core::{
    CancelEvent, CancelReason, EngineError, Event, FillEvent, MarketEvent, OrderEvent, OrderId,
    OrderStatus, OrderStoreError, OrderType, PortfolioError, QueueError, Side, SignalAction,
    SignalEvent, SymbolId,
};
pub use engine::{Dispatcher, DispatcherStats, MarketSource, Strategy};
pub use execution::{ExecutionEngine, SimulatedExecutionEngine};
pub use portfolio::{PortfolioManager, PortfolioMetrics, Position, RiskLimits, RiskRejection};
pub use queue::EventQueue;

pub use anyhow::{Error, Result};

/// Convenient imports for downstream crates wiring up a dispatcher.
pub mod prelude {
    pub use crate::core::{
        CancelEvent, CancelReason, Event, FillEvent, MarketEvent, OrderEvent, OrderId, OrderType,
        Side, SignalAction, SignalEvent, SymbolId,
    };
    pub use crate::engine::{Dispatcher, DispatcherStats, MarketSource, Strategy};
    pub use crate::execution::{ExecutionEngine, SimulatedExecutionEngine};
    pub use crate::portfolio::{PortfolioManager, PortfolioMetrics, Position, RiskLimits};
    pub use crate::queue::EventQueue;
    pub use crate::{Error, Result};
}
