//! The event dispatcher: the run loop that ties a market source, a
//! strategy, the portfolio manager and an execution engine together.

pub mod dispatcher;
pub mod traits;

pub use dispatcher::{Dispatcher, DispatcherStats};
pub use traits::{MarketSource, Strategy};
