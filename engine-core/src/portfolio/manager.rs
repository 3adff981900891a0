//! The portfolio manager: owns the fixed symbol universe, the risk table,
//! every symbol's [`Position`], and the order id allocator.
//!
//! Parameterized by a const generic `N`, the maximum number of symbols the
//! portfolio will ever track. This is the const-generic analogue of the
//! teacher's `Engine<S, E>` compile-time composition: `N` is resolved at
//! compile time so `positions` is a plain array with no heap allocation and
//! no bounds-check-by-indirection through a `Vec`.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::core::{
    CancelReason, FillEvent, MarketEvent, OrderEvent, OrderFlags, OrderId, OrderIdAllocator, OrderType,
    PortfolioError, Side, SignalAction, SignalEvent, SymbolId,
};

use super::position::Position;

/// Static risk limits enforced before a signal is allowed to become an
/// order. All limits are per-symbol except `max_gross_notional`.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct RiskLimits {
    /// Largest absolute position (existing + pending + requested) allowed
    /// in a single symbol.
    pub max_position_quantity: f64,
    /// Largest single order quantity.
    pub max_order_quantity: f64,
    /// Largest absolute notional (quantity * price) for a single order.
    pub max_order_notional: f64,
    /// Largest total notional exposure summed across all symbols.
    pub max_gross_notional: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_quantity: f64::INFINITY,
            max_order_quantity: f64::INFINITY,
            max_order_notional: f64::INFINITY,
            max_gross_notional: f64::INFINITY,
        }
    }
}

/// Why a signal did not turn into an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskRejection {
    PositionLimitExceeded,
    OrderQuantityLimitExceeded,
    OrderNotionalLimitExceeded,
    GrossNotionalLimitExceeded,
    UnknownSymbol,
    InsufficientCash,
}

/// Result of running a signal through risk checks.
///
/// `Rejected` is deliberately not an error: a rejected signal is an
/// ordinary, expected outcome that still increments a counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalOutcome {
    Approved(OrderEvent),
    Rejected(RiskRejection),
}

/// Point-in-time portfolio metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioMetrics {
    pub active_positions: usize,
    pub gross_notional: f64,
    pub net_realized_pnl: f64,
    pub net_unrealized_pnl: f64,
    pub total_trade_count: u64,
}

/// Owns the fixed symbol universe, risk limits, per-symbol positions, cash,
/// and order id allocation.
pub struct PortfolioManager<const N: usize> {
    symbols: HashMap<String, SymbolId>,
    positions: [Position; N],
    last_price: [f64; N],
    /// Bitmap of which slots in `positions` are non-flat, so metrics can
    /// iterate only active positions instead of scanning all of `N`.
    active: [bool; N],
    limits: RiskLimits,
    cash: f64,
    order_ids: OrderIdAllocator,
    risk_rejections: u64,
    /// Realized P&L summed across every fill ever applied, including symbols
    /// that have since gone flat and dropped out of `active`. Unlike
    /// `gross_notional`/`get_total_value`, this can't be derived by summing
    /// `positions[..].realized_pnl` over the active bitmap alone, so it's
    /// tracked as its own running total.
    cumulative_realized_pnl: f64,
}

impl<const N: usize> PortfolioManager<N> {
    pub fn new(symbol_names: &[&str], starting_cash: f64, limits: RiskLimits) -> Self {
        assert!(symbol_names.len() <= N, "symbol universe exceeds portfolio capacity N={N}");
        let mut symbols = HashMap::with_capacity(symbol_names.len());
        for (idx, name) in symbol_names.iter().enumerate() {
            symbols.insert((*name).to_string(), idx);
        }
        Self {
            symbols,
            positions: [Position::default(); N],
            last_price: [0.0; N],
            active: [false; N],
            limits,
            cash: starting_cash,
            order_ids: OrderIdAllocator::new(),
            risk_rejections: 0,
            cumulative_realized_pnl: 0.0,
        }
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn position(&self, symbol: SymbolId) -> Result<&Position, PortfolioError> {
        self.positions.get(symbol).ok_or(PortfolioError::OutOfRange(symbol))
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn risk_rejections(&self) -> u64 {
        self.risk_rejections
    }

    /// Record a market data update: the latest price for a symbol, used by
    /// `compute_metrics`/`get_total_value` for mark-to-market.
    pub fn on_market_data(&mut self, event: &MarketEvent) -> Result<(), PortfolioError> {
        let symbol = event.symbol;
        if symbol >= N {
            return Err(PortfolioError::OutOfRange(symbol));
        }
        if !event.is_valid() {
            return Err(PortfolioError::InvalidInput(format!("non-finite market price for symbol {symbol}")));
        }
        self.last_price[symbol] = event.price;
        Ok(())
    }

    /// Run a strategy's signal through pre-trade risk checks and, if
    /// approved, allocate an order id and build the `OrderEvent` to submit.
    pub fn on_signal(&mut self, signal: &SignalEvent) -> Result<SignalOutcome, PortfolioError> {
        let symbol = signal.symbol;
        if symbol >= N {
            return Err(PortfolioError::OutOfRange(symbol));
        }
        if !(signal.quantity > 0.0) || !signal.quantity.is_finite() {
            return Err(PortfolioError::InvalidInput(format!(
                "signal quantity must be positive and finite, got {}",
                signal.quantity
            )));
        }

        match self.can_execute(signal) {
            Some(rejection) => {
                self.risk_rejections += 1;
                warn!(symbol, ?rejection, "signal rejected by pre-trade risk checks");
                Ok(SignalOutcome::Rejected(rejection))
            }
            None => {
                let order_id = self.order_ids.next();
                let order = OrderEvent {
                    order_id,
                    symbol,
                    timestamp: signal.timestamp,
                    side: signal.side,
                    order_type: signal.order_type,
                    quantity: signal.quantity,
                    limit_price: signal.limit_price,
                    flags: if matches!(signal.action, SignalAction::Exit) {
                        OrderFlags::REDUCE_ONLY
                    } else {
                        OrderFlags::NONE
                    },
                };
                self.positions[symbol].pending_quantity += Position::signed_pending(signal.side, signal.quantity);
                Ok(SignalOutcome::Approved(order))
            }
        }
    }

    /// Pre-trade risk gate. Returns `None` when the signal may proceed,
    /// `Some(rejection)` with the first violated limit otherwise.
    fn can_execute(&self, signal: &SignalEvent) -> Option<RiskRejection> {
        let symbol = signal.symbol;
        if symbol >= N {
            return Some(RiskRejection::UnknownSymbol);
        }
        let price = if matches!(signal.order_type, OrderType::Market) {
            self.last_price[symbol]
        } else {
            signal.limit_price
        };
        let notional = signal.quantity * price;

        if signal.quantity > self.limits.max_order_quantity {
            return Some(RiskRejection::OrderQuantityLimitExceeded);
        }
        if price > 0.0 && notional > self.limits.max_order_notional {
            return Some(RiskRejection::OrderNotionalLimitExceeded);
        }

        let position = &self.positions[symbol];
        let projected = position.quantity + position.pending_quantity + Position::signed_pending(signal.side, signal.quantity);
        if projected.abs() > self.limits.max_position_quantity {
            return Some(RiskRejection::PositionLimitExceeded);
        }

        let projected_gross = self.gross_notional() + notional;
        if projected_gross > self.limits.max_gross_notional {
            return Some(RiskRejection::GrossNotionalLimitExceeded);
        }

        if matches!(signal.side, Side::Buy) && notional > self.cash {
            return Some(RiskRejection::InsufficientCash);
        }

        None
    }

    /// Apply a fill: update position accounting, cash, and the active
    /// bitmap. Over-fills have already been clamped by the execution
    /// engine's order store before this is called.
    pub fn on_fill(&mut self, fill: &FillEvent) -> Result<(), PortfolioError> {
        let symbol = fill.symbol;
        if symbol >= N {
            return Err(PortfolioError::OutOfRange(symbol));
        }

        let position = &mut self.positions[symbol];
        position.pending_quantity -= Position::signed_pending(fill.side, fill.fill_quantity);
        let realized_before = position.realized_pnl;
        position.apply_fill(fill.side, fill.fill_quantity, fill.fill_price);
        self.cumulative_realized_pnl += position.realized_pnl - realized_before;
        self.cash -= fill.side.sign() as f64 * fill.fill_quantity * fill.fill_price;
        self.active[symbol] = !position.is_flat();
        self.last_price[symbol] = fill.fill_price;

        info!(
            symbol,
            side = %fill.side,
            quantity = fill.fill_quantity,
            price = fill.fill_price,
            realized_pnl = position.realized_pnl,
            "fill applied to position"
        );
        Ok(())
    }

    /// Release pending quantity for an order that was cancelled instead of
    /// filled, so the next risk check doesn't keep counting it.
    pub fn on_cancel(&mut self, order: &OrderEvent, reason: CancelReason) -> Result<(), PortfolioError> {
        let symbol = order.symbol;
        if symbol >= N {
            return Err(PortfolioError::OutOfRange(symbol));
        }
        self.positions[symbol].pending_quantity -= Position::signed_pending(order.side, order.quantity);
        if matches!(reason, CancelReason::RiskRejected) {
            self.risk_rejections += 1;
        }
        Ok(())
    }

    fn gross_notional(&self) -> f64 {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, &is_active)| is_active)
            .map(|(symbol, _)| self.positions[symbol].quantity.abs() * self.last_price[symbol])
            .sum()
    }

    /// Total account value: cash plus mark-to-market value of every active
    /// position. Iterates only active slots, not all `N`.
    pub fn get_total_value(&self) -> f64 {
        let positions_value: f64 = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, &is_active)| is_active)
            .map(|(symbol, _)| self.positions[symbol].quantity * self.last_price[symbol])
            .sum();
        self.cash + positions_value
    }

    pub fn compute_metrics(&self) -> PortfolioMetrics {
        let mut metrics = PortfolioMetrics::default();
        metrics.net_realized_pnl = self.cumulative_realized_pnl;
        for (symbol, &is_active) in self.active.iter().enumerate() {
            if !is_active {
                continue;
            }
            let position = &self.positions[symbol];
            metrics.active_positions += 1;
            metrics.gross_notional += position.quantity.abs() * self.last_price[symbol];
            metrics.net_unrealized_pnl += position.unrealized_pnl(self.last_price[symbol]);
            metrics.total_trade_count += position.trade_count;
        }
        metrics
    }
}
