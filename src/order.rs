//! The order value object and the factory that stamps fresh ids/timestamps.

use crate::clock::Clock;
use crate::id::IdAllocator;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Which side of the book an order rests or trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    /// Buyer: matches against resting asks, rests on the bid side.
    Buy,
    /// Seller: matches against resting bids, rests on the ask side.
    Sell,
}

impl Side {
    /// The opposite side, i.e. the side an incoming order of this side matches against.
    pub fn opposite(self) -> Side {
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

/// The matching semantics requested for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderType {
    /// Matches at its limit price or better; residual rests in the book.
    Limit,
    /// Matches at any available price; any residual is cancelled, never rests.
    Market,
    /// Immediate-or-cancel: matches like a limit order, but any residual is
    /// cancelled instead of resting.
    Ioc,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Ioc => write!(f, "IOC"),
        }
    }
}

/// The lifecycle state of an order.
///
/// ```text
/// OPEN ──partial fill──▶ PARTIAL ──more fills──▶ FILLED
///   │                       │
///   │                       └──cancel──▶ CANCELLED
///   └──cancel──▶ CANCELLED
///   └──reject at gateway──▶ REJECTED (terminal, never enters a book)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    /// Resting, untouched by any fill.
    Open,
    /// Resting or in-flight, partially filled.
    Partial,
    /// Fully filled. Terminal.
    Filled,
    /// Cancelled by the caller or by finalization (MARKET/IOC residual). Terminal.
    Cancelled,
    /// Rejected by gateway validation before reaching any book. Terminal.
    Rejected,
}

impl OrderStatus {
    /// Whether an order in this status is resting and eligible to match.
    pub fn is_active(self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::Partial)
    }

    /// Whether this status is terminal (the order must never be resubmitted).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// Fat-finger upper bound enforced by [`crate::gateway::Gateway`] validation,
/// re-exported here since [`Order::new_limit`] and [`Order::new_ioc`] share
/// the zero-price rejection logic that sits just below this ceiling.
pub const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

/// A single order: identity, side, type, status, price, and fill progress.
///
/// Owned exclusively by whichever [`crate::book::OrderBook`] currently holds
/// it (or by the caller while in transit to the gateway). `id` and
/// `timestamp` are immutable once assigned; every other field changes only
/// through matching or cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    id: u64,
    symbol: String,
    side: Side,
    order_type: OrderType,
    status: OrderStatus,
    price: f64,
    quantity: u64,
    filled: u64,
    timestamp: i64,
}

impl Order {
    /// Constructs a LIMIT order. `price` must be `> 0.0` and `quantity` must
    /// be `> 0`; callers that need validated construction should go through
    /// [`crate::gateway::Gateway::submit`] rather than calling this directly
    /// with unchecked input.
    pub fn new_limit(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        price: f64,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            status: OrderStatus::Open,
            price,
            quantity,
            filled: 0,
            timestamp,
        }
    }

    /// Constructs a MARKET order. Price is stored as `0.0` and ignored by
    /// every comparison the book performs.
    pub fn new_market(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            status: OrderStatus::Open,
            price: 0.0,
            quantity,
            filled: 0,
            timestamp,
        }
    }

    /// Constructs an IOC order. Carries a limit price like [`Order::new_limit`]
    /// but is finalized as CANCELLED instead of resting when residual remains.
    pub fn new_ioc(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        price: f64,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            order_type: OrderType::Ioc,
            status: OrderStatus::Open,
            price,
            quantity,
            filled: 0,
            timestamp,
        }
    }

    /// Opaque monotonically increasing identifier. Immutable.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The instrument this order targets.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Buy or sell.
    pub fn side(&self) -> Side {
        self.side
    }

    /// LIMIT, MARKET, or IOC.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Limit price; `0.0` for MARKET orders.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Original order quantity.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Quantity filled so far.
    pub fn filled(&self) -> u64 {
        self.filled
    }

    /// Monotonic nanosecond arrival timestamp. Immutable.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// `quantity - filled`.
    pub fn remaining(&self) -> u64 {
        self.quantity - self.filled
    }

    /// Whether `filled >= quantity`.
    pub fn is_filled(&self) -> bool {
        self.filled >= self.quantity
    }

    /// Whether this order is resting and eligible to match.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Applies a fill of `qty` and transitions status to PARTIAL or FILLED.
    ///
    /// Called only by the book's matching loop while holding the writer
    /// lock for this order's book.
    pub(crate) fn apply_fill(&mut self, qty: u64) {
        debug_assert!(qty <= self.remaining(), "fill exceeds remaining quantity");
        self.filled += qty;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }

    /// Marks the order OPEN or PARTIAL depending on whether any fill has
    /// occurred, for a LIMIT order about to rest in the book.
    pub(crate) fn mark_resting(&mut self) {
        self.status = if self.filled > 0 {
            OrderStatus::Partial
        } else {
            OrderStatus::Open
        };
    }

    /// Transitions to CANCELLED. No-op on an already-terminal order in the
    /// sense that callers are expected to check [`OrderStatus::is_active`]
    /// first via [`crate::book::OrderBook::cancel`]; called unconditionally
    /// here for residual-discarding finalization (MARKET/IOC).
    pub(crate) fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Cancelled;
    }

    /// Transitions to REJECTED. Called only by gateway validation, before
    /// the order ever reaches a book.
    pub(crate) fn mark_rejected(&mut self) {
        self.status = OrderStatus::Rejected;
    }
}

/// Bundles a shared [`IdAllocator`] and [`Clock`] to mint fresh [`Order`]s.
///
/// This is the implementation behind the two public construction points
/// named in the engine's external interface: `limit` and `market` (plus
/// `ioc`). The [`crate::gateway::Gateway`] owns one instance and is the
/// intended caller in ordinary use, but the factory has no hidden coupling
/// to the gateway.
pub struct OrderFactory {
    ids: Arc<IdAllocator>,
    clock: Arc<dyn Clock>,
}

impl OrderFactory {
    /// Creates a factory over a shared id allocator and clock.
    pub fn new(ids: Arc<IdAllocator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Mints a fresh LIMIT order with a new id and current timestamp.
    pub fn limit(&self, symbol: impl Into<String>, side: Side, price: f64, quantity: u64) -> Order {
        Order::new_limit(
            self.ids.next_order_id(),
            symbol,
            side,
            price,
            quantity,
            self.clock.now_ns(),
        )
    }

    /// Mints a fresh MARKET order with a new id and current timestamp.
    pub fn market(&self, symbol: impl Into<String>, side: Side, quantity: u64) -> Order {
        Order::new_market(
            self.ids.next_order_id(),
            symbol,
            side,
            quantity,
            self.clock.now_ns(),
        )
    }

    /// Mints a fresh IOC order with a new id and current timestamp.
    pub fn ioc(&self, symbol: impl Into<String>, side: Side, price: f64, quantity: u64) -> Order {
        Order::new_ioc(
            self.ids.next_order_id(),
            symbol,
            side,
            price,
            quantity,
            self.clock.now_ns(),
        )
    }
}
