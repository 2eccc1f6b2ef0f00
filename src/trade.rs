//! Execution records and the append-only sink that collects them.

use serde::Serialize;
use std::sync::Mutex;

/// An immutable execution record, created by the book during matching and
/// appended to a [`TradeLog`]. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    id: u64,
    symbol: String,
    buy_order_id: u64,
    sell_order_id: u64,
    price: f64,
    quantity: u64,
    timestamp: i64,
}

impl Trade {
    /// Constructs a trade record. Called only by the book's matching loop.
    pub(crate) fn new(
        id: u64,
        symbol: impl Into<String>,
        buy_order_id: u64,
        sell_order_id: u64,
        price: f64,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            timestamp,
        }
    }

    /// Monotonic trade id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The instrument traded.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The id of the order that was on the buy side of this trade.
    pub fn buy_order_id(&self) -> u64 {
        self.buy_order_id
    }

    /// The id of the order that was on the sell side of this trade.
    pub fn sell_order_id(&self) -> u64 {
        self.sell_order_id
    }

    /// Execution price. Always the resting (passive) order's price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Executed quantity. Always `> 0`.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Arrival timestamp of the incoming (aggressive) order that triggered this trade.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// `price * quantity`.
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Default)]
struct TradeLogInner {
    trades: Vec<Trade>,
    total_volume: u64,
    total_notional: f64,
}

/// An append-only, thread-safe sink of executed trades with incrementally
/// maintained aggregate statistics.
///
/// All mutation goes through a single internal mutex; under the engine's
/// concurrency model this is only ever contended by the handful of book
/// writer threads forwarding their just-produced trades, not by the
/// matching hot path itself (which holds no lock on the log while matching).
#[derive(Debug, Default)]
pub struct TradeLog {
    inner: Mutex<TradeLogInner>,
}

impl TradeLog {
    /// Creates an empty trade log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trade log that pre-allocates room for `capacity`
    /// trades, amortizing append cost for callers that know roughly how
    /// much volume to expect.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(TradeLogInner {
                trades: Vec::with_capacity(capacity),
                total_volume: 0,
                total_notional: 0.0,
            }),
        }
    }

    /// Appends a single trade.
    pub fn add(&self, trade: Trade) {
        let mut inner = self.inner.lock().expect("trade log mutex poisoned");
        inner.total_volume += trade.quantity;
        inner.total_notional += trade.notional();
        inner.trades.push(trade);
    }

    /// Appends every trade in `trades`, in order.
    pub fn add_all(&self, trades: impl IntoIterator<Item = Trade>) {
        let mut inner = self.inner.lock().expect("trade log mutex poisoned");
        for trade in trades {
            inner.total_volume += trade.quantity;
            inner.total_notional += trade.notional();
            inner.trades.push(trade);
        }
    }

    /// Number of trades recorded.
    pub fn count(&self) -> usize {
        self.inner.lock().expect("trade log mutex poisoned").trades.len()
    }

    /// Sum of executed quantities across all trades.
    pub fn total_volume(&self) -> u64 {
        self.inner.lock().expect("trade log mutex poisoned").total_volume
    }

    /// Sum of `price * quantity` across all trades.
    pub fn total_notional(&self) -> f64 {
        self.inner.lock().expect("trade log mutex poisoned").total_notional
    }

    /// Volume-weighted average price: `total_notional / total_volume`,
    /// or `0.0` when no volume has traded.
    pub fn vwap(&self) -> f64 {
        let inner = self.inner.lock().expect("trade log mutex poisoned");
        if inner.total_volume == 0 {
            0.0
        } else {
            inner.total_notional / inner.total_volume as f64
        }
    }

    /// Returns a snapshot copy of every trade recorded so far, in append order.
    pub fn snapshot(&self) -> Vec<Trade> {
        self.inner.lock().expect("trade log mutex poisoned").trades.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(id: u64, price: f64, qty: u64) -> Trade {
        Trade::new(id, "AAPL", 1, 2, price, qty, 100)
    }

    #[test]
    fn empty_log_has_zero_vwap() {
        let log = TradeLog::new();
        assert_eq!(log.count(), 0);
        assert_eq!(log.total_volume(), 0);
        assert_eq!(log.total_notional(), 0.0);
        assert_eq!(log.vwap(), 0.0);
    }

    #[test]
    fn add_accumulates_aggregates() {
        let log = TradeLog::new();
        log.add(trade(1, 189.0, 100));
        assert_eq!(log.count(), 1);
        assert_eq!(log.total_volume(), 100);
        assert_eq!(log.total_notional(), 18_900.0);
        assert_eq!(log.vwap(), 189.0);
    }

    #[test]
    fn add_all_appends_in_order_and_accumulates() {
        let log = TradeLog::new();
        log.add_all(vec![trade(1, 100.0, 10), trade(2, 200.0, 10)]);
        assert_eq!(log.count(), 2);
        assert_eq!(log.total_volume(), 20);
        assert_eq!(log.total_notional(), 3_000.0);
        assert_eq!(log.vwap(), 150.0);

        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].id(), 1);
        assert_eq!(snapshot[1].id(), 2);
    }

    #[test]
    fn notional_is_price_times_quantity() {
        let t = trade(1, 50.5, 4);
        assert_eq!(t.notional(), 202.0);
    }
}
