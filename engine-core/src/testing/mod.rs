//! Shared test doubles for downstream integration tests: a scriptable
//! market source, a scriptable strategy, and a no-op execution engine.

pub mod helpers;

pub use helpers::{MockExecutionEngine, MockMarketSource, MockStrategy};
