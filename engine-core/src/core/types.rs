//! Zero-overhead core types for the backtesting engine
//!
//! Order identifiers, sides, order types and flags are kept as small Copy
//! types so that events can be moved through the queue without heap
//! allocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an order, unique within a single engine lifetime.
///
/// Backed by a monotonically increasing counter rather than a random value:
/// the portfolio manager is the sole allocator (see [`OrderIdAllocator`]) and
/// callers need ordering, not uniqueness-by-construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline(always)]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for OrderId {
    #[inline(always)]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Monotonically increasing order id allocator.
///
/// The portfolio manager owns exactly one of these; it is atomic only so
/// that read-only callers (metrics, UIs) can observe the counter without
/// taking a lock, not because the engine loop is multi-writer.
#[derive(Debug, Default)]
pub struct OrderIdAllocator(AtomicU64);

impl OrderIdAllocator {
    pub const fn new() -> Self {
        // Counter starts at 1 so that `OrderId(0)` stays reserved as a
        // sentinel for "no order".
        Self(AtomicU64::new(1))
    }

    #[inline]
    pub fn next(&self) -> OrderId {
        OrderId(self.0.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn peek(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Dense integer identifier for a symbol in the portfolio's fixed universe,
/// in `[0, N)`.
pub type SymbolId = usize;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    /// +1 for buy, -1 for sell. Useful for sign-of-position arithmetic.
    #[inline(always)]
    pub const fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    #[inline(always)]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type. Price is ignored for `Market` orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    StopLimit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::StopMarket => write!(f, "STOP_MARKET"),
            OrderType::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Execution flags, combinable as a bitset.
///
/// `IOC` and `FOK` only make sense for liquidity-taking fills; `PostOnly`
/// only for liquidity-adding ones; `ReduceOnly` constrains the sign of the
/// resulting position and is orthogonal to the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct OrderFlags(u8);

impl OrderFlags {
    pub const NONE: OrderFlags = OrderFlags(0);
    pub const IOC: OrderFlags = OrderFlags(1 << 0);
    pub const FOK: OrderFlags = OrderFlags(1 << 1);
    pub const POST_ONLY: OrderFlags = OrderFlags(1 << 2);
    pub const REDUCE_ONLY: OrderFlags = OrderFlags(1 << 3);

    #[inline(always)]
    pub const fn contains(self, flag: OrderFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline(always)]
    pub const fn union(self, other: OrderFlags) -> OrderFlags {
        OrderFlags(self.0 | other.0)
    }

    pub fn is_ioc(self) -> bool {
        self.contains(Self::IOC)
    }

    pub fn is_fok(self) -> bool {
        self.contains(Self::FOK)
    }

    pub fn is_post_only(self) -> bool {
        self.contains(Self::POST_ONLY)
    }

    pub fn is_reduce_only(self) -> bool {
        self.contains(Self::REDUCE_ONLY)
    }
}

impl std::ops::BitOr for OrderFlags {
    type Output = OrderFlags;
    fn bitor(self, rhs: OrderFlags) -> OrderFlags {
        self.union(rhs)
    }
}

impl fmt::Display for OrderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.is_ioc() {
            parts.push("IOC");
        }
        if self.is_fok() {
            parts.push("FOK");
        }
        if self.is_post_only() {
            parts.push("POST_ONLY");
        }
        if self.is_reduce_only() {
            parts.push("REDUCE_ONLY");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join("|"))
        }
    }
}

/// Returns true if `value` is finite and strictly positive, the contract
/// required of every price and quantity field in the event model.
#[inline]
pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Total-ordering wrapper around `f64` prices, so they can key a `BTreeMap`
/// price level. Only ever constructed from validated (finite) prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceKey(pub f64);

impl PriceKey {
    #[inline(always)]
    pub const fn new(price: f64) -> Self {
        Self(price)
    }
}

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_allocator_starts_at_one_and_increments() {
        let alloc = OrderIdAllocator::new();
        assert_eq!(alloc.next(), OrderId(1));
        assert_eq!(alloc.next(), OrderId(2));
        assert_eq!(alloc.peek(), 3);
    }

    #[test]
    fn side_sign_and_opposite() {
        assert_eq!(Side::Buy.sign(), 1);
        assert_eq!(Side::Sell.sign(), -1);
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn order_flags_combine() {
        let flags = OrderFlags::IOC | OrderFlags::REDUCE_ONLY;
        assert!(flags.is_ioc());
        assert!(flags.is_reduce_only());
        assert!(!flags.is_fok());
        assert!(!flags.is_post_only());
    }

    #[test]
    fn positive_finite_rejects_nan_inf_and_nonpositive() {
        assert!(is_positive_finite(1.0));
        assert!(!is_positive_finite(0.0));
        assert!(!is_positive_finite(-1.0));
        assert!(!is_positive_finite(f64::NAN));
        assert!(!is_positive_finite(f64::INFINITY));
    }
}
