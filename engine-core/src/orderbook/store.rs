//! Price-time priority order store.
//!
//! Bids are kept best-first (highest price, then earliest insertion); asks
//! are kept best-first (lowest price, then earliest insertion). An
//! `OrderId -> (side, price bucket)` index makes cancel and lookup O(log n)
//! instead of a linear scan of the book.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::core::{FillOutcome, OrderEvent, OrderId, OrderRecord, OrderStatus, OrderStoreError, PriceKey, Side};

use super::ledger::OrderLedger;

/// One price level: orders in arrival order, earliest first.
type PriceLevel = VecDeque<OrderId>;

/// Where a live order sits, so cancel/fill don't need to scan price levels.
#[derive(Debug, Clone, Copy)]
struct Location {
    side: Side,
    price: PriceKey,
}

/// Holds resting orders for one symbol's book plus a bounded history of
/// orders that have reached a terminal state.
pub struct OrderStore {
    next_sequence: u64,
    bids: BTreeMap<PriceKey, PriceLevel>,
    asks: BTreeMap<PriceKey, PriceLevel>,
    records: HashMap<OrderId, OrderRecord>,
    locations: HashMap<OrderId, Location>,
    pub ledger: OrderLedger,
}

impl OrderStore {
    pub fn new(ledger_capacity: usize) -> Self {
        Self {
            next_sequence: 0,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            records: HashMap::new(),
            locations: HashMap::new(),
            ledger: OrderLedger::new(ledger_capacity),
        }
    }

    /// Insert a new resting order. The caller (the execution engine) has
    /// already decided this order belongs in the book.
    pub fn insert(&mut self, order: &OrderEvent) -> &OrderRecord {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let record = OrderRecord::new(order, sequence);
        let price = PriceKey::new(order.limit_price);
        let level = match order.side {
            Side::Buy => self.bids.entry(price).or_default(),
            Side::Sell => self.asks.entry(price).or_default(),
        };
        level.push_back(order.order_id);
        self.locations.insert(order.order_id, Location { side: order.side, price });
        self.records.insert(order.order_id, record);
        self.records.get(&order.order_id).expect("just inserted")
    }

    pub fn get(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.records.get(&order_id)
    }

    /// Best bid price, if any orders rest on the buy side.
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.keys().next_back().map(|p| p.0)
    }

    /// Best ask price, if any orders rest on the sell side.
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.keys().next().map(|p| p.0)
    }

    /// Apply a fill to a resting order, removing it from the book once it
    /// reaches a terminal state.
    pub fn apply_fill(
        &mut self,
        order_id: OrderId,
        fill_quantity: f64,
        timestamp: i64,
    ) -> Result<FillOutcome, OrderStoreError> {
        let record = self
            .records
            .get_mut(&order_id)
            .ok_or(OrderStoreError::UnknownOrder(order_id))?;
        let outcome = record.apply_fill(fill_quantity, timestamp)?;
        if outcome == FillOutcome::Complete {
            self.retire(order_id);
        }
        Ok(outcome)
    }

    pub fn cancel(&mut self, order_id: OrderId, timestamp: i64) -> Result<(), OrderStoreError> {
        let record = self
            .records
            .get_mut(&order_id)
            .ok_or(OrderStoreError::UnknownOrder(order_id))?;
        record.cancel(timestamp)?;
        self.retire(order_id);
        Ok(())
    }

    /// Remove a terminal order from the book and move its final snapshot
    /// into the historical ledger.
    fn retire(&mut self, order_id: OrderId) {
        let Some(location) = self.locations.remove(&order_id) else { return };
        let level = match location.side {
            Side::Buy => self.bids.get_mut(&location.price),
            Side::Sell => self.asks.get_mut(&location.price),
        };
        if let Some(level) = level {
            level.retain(|id| *id != order_id);
            let empty = level.is_empty();
            if empty {
                match location.side {
                    Side::Buy => self.bids.remove(&location.price),
                    Side::Sell => self.asks.remove(&location.price),
                };
            }
        }
        if let Some(record) = self.records.remove(&order_id) {
            debug_assert!(record.status.is_terminal());
            self.ledger.push(record);
        }
    }

    pub fn active_order_count(&self) -> usize {
        self.records.values().filter(|r| r.status == OrderStatus::New || r.status == OrderStatus::PartiallyFilled).count()
    }
}
