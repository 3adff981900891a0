//! Domain-specific error types for the engine core
//!
//! These error types provide precise information about failures in the event
//! dispatch, order store and portfolio layers, enabling the dispatcher to
//! decide which ones are fatal and which are ordinary outcomes.

use thiserror::Error;

use super::types::{OrderId, SymbolId};

/// Errors produced by the event queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `pop()` was called on an empty queue with no source to poll.
    #[error("event queue is empty")]
    Empty,

    /// The bounded internal queue rejected a push because it is full.
    #[error("event queue is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// Errors produced by the order store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    /// Lookup or cancel referenced an id the store has never seen, or has
    /// already evicted from its active tables.
    #[error("unknown order id {0}")]
    UnknownOrder(OrderId),

    /// An operation tried to mutate an order that is already in a terminal
    /// state (filled or cancelled).
    #[error("order {0} is already terminal")]
    AlreadyTerminal(OrderId),

    /// A price or quantity field failed the positive-finite contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors produced by the portfolio manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    /// A symbol id fell outside `[0, N)`.
    #[error("symbol id {0} is out of range for this portfolio")]
    OutOfRange(SymbolId),

    /// A field failed basic validation (NaN, negative, zero quantity, etc).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Top-level error type returned by the dispatcher's run loop.
///
/// Per the error-handling design, `RiskRejected` and `OverFill` are
/// deliberately NOT represented here: they are ordinary outcomes reported
/// through return values and counters, not through `Result::Err`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    OrderStore(#[from] OrderStoreError),

    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    /// The market source or execution engine returned an error.
    #[error("external component error: {0}")]
    External(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_error_display() {
        let err = QueueError::Full { capacity: 1024 };
        assert_eq!(err.to_string(), "event queue is full (capacity 1024)");
    }

    #[test]
    fn order_store_error_display() {
        let err = OrderStoreError::UnknownOrder(OrderId::new(7));
        assert_eq!(err.to_string(), "unknown order id #7");
    }

    #[test]
    fn portfolio_error_out_of_range_display() {
        let err = PortfolioError::OutOfRange(3);
        assert_eq!(err.to_string(), "symbol id 3 is out of range for this portfolio");
    }

    #[test]
    fn engine_error_wraps_queue_error() {
        let err: EngineError = QueueError::Empty.into();
        assert_eq!(err.to_string(), "event queue is empty");
    }
}
