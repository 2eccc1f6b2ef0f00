//! The price-time priority matching loop.

use super::entry::{AskEntry, BidEntry, BookEntry, RestingOrder};
use super::{BookState, OrderBook};
use crate::order::{Order, OrderType, Side};
use crate::trade::Trade;
use dashmap::DashMap;
use std::collections::BinaryHeap;
use std::collections::binary_heap::PeekMut;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

impl OrderBook {
    /// Submits `order` for matching against the opposite side of the book.
    ///
    /// Mutates `order` in place to reflect its final status and fill
    /// progress, and returns every trade produced. A LIMIT order with
    /// residual quantity after matching is left resting in the book; a
    /// MARKET or IOC order's residual is discarded instead (never rests).
    pub fn submit(&self, order: &mut Order) -> Vec<Trade> {
        let mut state = self.state.write().expect("book lock poisoned");
        let mut trades = Vec::new();

        let side = order.side();
        let order_type = order.order_type();
        let limit_price = order.price();
        let crosses = move |passive_price: f64| -> bool {
            match order_type {
                OrderType::Market => true,
                OrderType::Limit | OrderType::Ioc => match side {
                    Side::Buy => limit_price >= passive_price,
                    Side::Sell => limit_price <= passive_price,
                },
            }
        };

        match side {
            Side::Buy => drain_against(&mut state.asks, &self.index, self.symbol(), &self.ids, order, &crosses, &mut trades),
            Side::Sell => drain_against(&mut state.bids, &self.index, self.symbol(), &self.ids, order, &crosses, &mut trades),
        }

        self.finalize(&mut state, order);

        debug!(
            order_id = order.id(),
            symbol = %self.symbol,
            side = %side,
            order_type = %order_type,
            trades = trades.len(),
            status = ?order.status(),
            "order submitted"
        );

        trades
    }

    /// Applies finalization rules once matching against the opposite side
    /// has stopped: a filled order needs no further action (its status was
    /// already set to FILLED by the last `apply_fill`); a LIMIT order with
    /// residual rests; a MARKET or IOC order with residual is cancelled.
    fn finalize(&self, state: &mut BookState, order: &mut Order) {
        if order.is_filled() {
            return;
        }
        match order.order_type() {
            OrderType::Limit => {
                order.mark_resting();
                self.rest(state, order.clone());
            }
            OrderType::Market | OrderType::Ioc => {
                order.mark_cancelled();
            }
        }
    }

    /// Inserts a just-finalized resting order into its side's heap and the
    /// id index.
    fn rest(&self, state: &mut BookState, order: Order) {
        let id = order.id();
        let price = order.price();
        let timestamp = order.timestamp();
        let side = order.side();
        let handle: RestingOrder = Arc::new(Mutex::new(order));
        self.index.insert(id, Arc::clone(&handle));
        match side {
            Side::Buy => state.bids.push(BidEntry { price, timestamp, id, order: handle }),
            Side::Sell => state.asks.push(AskEntry { price, timestamp, id, order: handle }),
        }
        trace!(order_id = id, symbol = %self.symbol, "order rested");
    }
}

/// Drains `heap` against `incoming` while prices cross, emitting one trade
/// per match at the passive (resting) order's price. Lazily discards any
/// inactive entry found at the top rather than skipping past it, matching
/// the engine's lazy-deletion contract: an order cancelled while resting
/// below the top is left untouched until it bubbles up here.
#[allow(clippy::too_many_arguments)]
fn drain_against<T: BookEntry>(
    heap: &mut BinaryHeap<T>,
    index: &DashMap<u64, RestingOrder>,
    symbol: &str,
    ids: &Arc<crate::id::IdAllocator>,
    incoming: &mut Order,
    crosses: &dyn Fn(f64) -> bool,
    trades: &mut Vec<Trade>,
) {
    loop {
        if incoming.remaining() == 0 {
            break;
        }
        let Some(top) = heap.peek_mut() else {
            break;
        };

        let mut passive = top.order().lock().expect("order mutex poisoned");
        if !passive.is_active() {
            drop(passive);
            let discarded = PeekMut::pop(top);
            index.remove(&discarded.id());
            trace!(order_id = discarded.id(), symbol, "lazy-deletion discard");
            continue;
        }

        let passive_price = passive.price();
        if !crosses(passive_price) {
            // Top is active but does not cross; nothing below it could
            // cross either given the heap's price ordering, so stop.
            break;
        }

        let fill_qty = incoming.remaining().min(passive.remaining());
        incoming.apply_fill(fill_qty);
        passive.apply_fill(fill_qty);
        let passive_id = passive.id();
        let passive_filled = passive.is_filled();
        drop(passive);

        let (buy_order_id, sell_order_id) = match incoming.side() {
            Side::Buy => (incoming.id(), passive_id),
            Side::Sell => (passive_id, incoming.id()),
        };
        trades.push(Trade::new(
            ids.next_trade_id(),
            symbol,
            buy_order_id,
            sell_order_id,
            passive_price,
            fill_qty,
            incoming.timestamp(),
        ));

        if passive_filled {
            index.remove(&passive_id);
            PeekMut::pop(top);
        }
        // Otherwise the passive order is only partially filled and stays at
        // the top of its heap (its key fields are unchanged); `top` drops
        // here, re-sifting it in place without removal.
    }
}
