//! The event model: a tagged union of the five event kinds the dispatcher
//! routes, plus the lightweight signal actions a strategy can request.
//!
//! Events are moved through the queue by value. Keeping them as an enum
//! (rather than trait objects) means the dispatcher's routing is a single
//! exhaustive match compiled to a jump table, with no vtable indirection.

use std::fmt;

use super::types::{is_positive_finite, OrderFlags, OrderId, OrderType, Side, SymbolId};

/// A market data update for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketEvent {
    pub symbol: SymbolId,
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
}

impl MarketEvent {
    pub fn is_valid(&self) -> bool {
        is_positive_finite(self.price) && self.volume.is_finite() && self.volume >= 0.0
    }
}

/// Action a strategy's signal asks the portfolio manager to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Enter,
    Exit,
    Adjust,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Enter => write!(f, "ENTER"),
            SignalAction::Exit => write!(f, "EXIT"),
            SignalAction::Adjust => write!(f, "ADJUST"),
        }
    }
}

/// A strategy's request to change exposure in a symbol.
///
/// `SignalEvent` carries intent, not an order: the portfolio manager
/// translates it into zero or more `OrderEvent`s after running risk checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    pub symbol: SymbolId,
    pub timestamp: i64,
    pub action: SignalAction,
    pub side: Side,
    pub quantity: f64,
    pub order_type: OrderType,
    /// Limit price; ignored for `OrderType::Market`.
    pub limit_price: f64,
}

/// A concrete order submission, already risk-approved, addressed to an
/// execution engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub symbol: SymbolId,
    pub timestamp: i64,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub limit_price: f64,
    pub flags: OrderFlags,
}

impl OrderEvent {
    pub fn is_valid(&self) -> bool {
        let price_ok = matches!(self.order_type, OrderType::Market) || is_positive_finite(self.limit_price);
        is_positive_finite(self.quantity) && price_ok
    }
}

/// Notification that an order (fully or partially) filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillEvent {
    pub order_id: OrderId,
    pub symbol: SymbolId,
    pub timestamp: i64,
    pub side: Side,
    pub fill_quantity: f64,
    pub fill_price: f64,
    /// True when this fill leaves the order fully filled.
    pub is_final: bool,
}

/// Notification that an order was cancelled (by request or by the engine).
///
/// Carries `side`/`quantity` from the cancelled order itself rather than
/// leaving a consumer to look the order up elsewhere: the order may never
/// have been inserted anywhere a post-hoc lookup could find it (an
/// execution engine can reject an order outright, before it ever touches
/// its own book), so the cancel has to be self-describing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancelEvent {
    pub order_id: OrderId,
    pub symbol: SymbolId,
    pub timestamp: i64,
    pub side: Side,
    pub quantity: f64,
    pub reason: CancelReason,
}

/// Why an order left the book without filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Requested,
    RiskRejected,
    ExecutionRejected,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "requested"),
            CancelReason::RiskRejected => write!(f, "risk_rejected"),
            CancelReason::ExecutionRejected => write!(f, "execution_rejected"),
        }
    }
}

/// The tagged union routed by the dispatcher.
///
/// Ordering matters only for `Display`; the dispatcher matches on these
/// variants directly rather than going through a trait object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
    Cancel(CancelEvent),
}

impl Event {
    pub fn timestamp(&self) -> i64 {
        match self {
            Event::Market(e) => e.timestamp,
            Event::Signal(e) => e.timestamp,
            Event::Order(e) => e.timestamp,
            Event::Fill(e) => e.timestamp,
            Event::Cancel(e) => e.timestamp,
        }
    }

    pub fn symbol(&self) -> SymbolId {
        match self {
            Event::Market(e) => e.symbol,
            Event::Signal(e) => e.symbol,
            Event::Order(e) => e.symbol,
            Event::Fill(e) => e.symbol,
            Event::Cancel(e) => e.symbol,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Market(_) => "market",
            Event::Signal(_) => "signal",
            Event::Order(_) => "order",
            Event::Fill(_) => "fill",
            Event::Cancel(_) => "cancel",
        }
    }
}

impl From<MarketEvent> for Event {
    fn from(e: MarketEvent) -> Self {
        Event::Market(e)
    }
}

impl From<SignalEvent> for Event {
    fn from(e: SignalEvent) -> Self {
        Event::Signal(e)
    }
}

impl From<OrderEvent> for Event {
    fn from(e: OrderEvent) -> Self {
        Event::Order(e)
    }
}

impl From<FillEvent> for Event {
    fn from(e: FillEvent) -> Self {
        Event::Fill(e)
    }
}

impl From<CancelEvent> for Event {
    fn from(e: CancelEvent) -> Self {
        Event::Cancel(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_market() -> MarketEvent {
        MarketEvent { symbol: 0, timestamp: 100, price: 50.0, volume: 10.0 }
    }

    #[test]
    fn market_event_validity() {
        assert!(sample_market().is_valid());
        let mut bad = sample_market();
        bad.price = f64::NAN;
        assert!(!bad.is_valid());
        bad = sample_market();
        bad.price = -1.0;
        assert!(!bad.is_valid());
    }

    #[test]
    fn order_event_market_type_ignores_limit_price() {
        let order = OrderEvent {
            order_id: OrderId::new(1),
            symbol: 0,
            timestamp: 100,
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity: 10.0,
            limit_price: 0.0,
            flags: OrderFlags::NONE,
        };
        assert!(order.is_valid());
    }

    #[test]
    fn order_event_limit_requires_positive_price() {
        let order = OrderEvent {
            order_id: OrderId::new(1),
            symbol: 0,
            timestamp: 100,
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity: 10.0,
            limit_price: 0.0,
            flags: OrderFlags::NONE,
        };
        assert!(!order.is_valid());
    }

    #[test]
    fn event_dispatch_accessors_match_inner_variant() {
        let ev: Event = sample_market().into();
        assert_eq!(ev.kind(), "market");
        assert_eq!(ev.timestamp(), 100);
        assert_eq!(ev.symbol(), 0);
    }
}
