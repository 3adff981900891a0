//! Core event and order types shared across the engine.
//!
//! - [`types`]: small Copy identifiers (`OrderId`, `SymbolId`, `Side`, ...).
//! - [`event`]: the tagged-union event model routed by the dispatcher.
//! - [`order_fsm`]: order lifecycle status and validated fill/cancel mutations.
//! - [`errors`]: the error taxonomy, split by which layer raises it.

pub mod errors;
pub mod event;
pub mod order_fsm;
pub mod types;

pub use errors::{EngineError, OrderStoreError, PortfolioError, QueueError};
pub use event::{
    CancelEvent, CancelReason, Event, FillEvent, MarketEvent, OrderEvent, SignalAction, SignalEvent,
};
pub use order_fsm::{FillOutcome, OrderRecord, OrderStatus};
pub use types::{is_positive_finite, OrderFlags, OrderId, OrderIdAllocator, OrderType, PriceKey, Side, SymbolId};
