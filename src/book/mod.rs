//! Per-symbol order book: two price-time priority queues behind an `RwLock`.

mod entry;
mod matching;

use crate::id::IdAllocator;
use crate::order::Order;
use dashmap::DashMap;
use entry::{AskEntry, BidEntry, BookEntry, RestingOrder};
use std::collections::BinaryHeap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// The two priority queues protected by the book's single writer/reader lock.
struct BookState {
    bids: BinaryHeap<BidEntry>,
    asks: BinaryHeap<AskEntry>,
}

/// A single instrument's order book.
///
/// `submit` and `cancel` take the writer lock for their entire critical
/// section; `best_bid`, `best_ask`, `spread`, and `depth` take only the
/// reader lock and never mutate the heaps, so cancelled or filled entries
/// that still physically sit at the top are reported as absent rather than
/// cleaned up — cleanup happens lazily, the next time a writer visits that
/// position.
pub struct OrderBook {
    symbol: String,
    state: RwLock<BookState>,
    index: DashMap<u64, RestingOrder>,
    ids: Arc<IdAllocator>,
}

impl OrderBook {
    /// Creates an empty book for `symbol`, sharing `ids` with its [`crate::gateway::Gateway`]
    /// so trade ids it mints never collide with trade ids minted by sibling books.
    pub fn new(symbol: impl Into<String>, ids: Arc<IdAllocator>) -> Self {
        Self {
            symbol: symbol.into(),
            state: RwLock::new(BookState {
                bids: BinaryHeap::new(),
                asks: BinaryHeap::new(),
            }),
            index: DashMap::new(),
            ids,
        }
    }

    /// The instrument this book matches.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Cancels a resting order by id.
    ///
    /// Returns `true` if the order was found and was still active (and is
    /// now marked CANCELLED in place); returns `false` if the id is unknown
    /// or the order had already reached a terminal status. The order's heap
    /// entry is not physically removed here — it is discarded the next time
    /// matching or a top-of-book query visits it.
    pub fn cancel(&self, order_id: u64) -> bool {
        // Acquiring the writer lock, even though cancellation itself never
        // touches the heaps, serializes this call against any in-flight
        // `submit` so a cancel can never race a fill of the same order.
        let _guard = self.state.write().expect("book lock poisoned");
        match self.index.remove(&order_id) {
            Some((_, handle)) => {
                let mut order = handle.lock().expect("order mutex poisoned");
                if order.is_active() {
                    order.mark_cancelled();
                    debug!(order_id, symbol = %self.symbol, "order cancelled");
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Current best bid price, or `None` if the bid side is empty or its top
    /// entry is a not-yet-cleaned-up inactive order.
    pub fn best_bid(&self) -> Option<f64> {
        let state = self.state.read().expect("book lock poisoned");
        top_active_price(&state.bids)
    }

    /// Current best ask price, or `None` if the ask side is empty or its top
    /// entry is a not-yet-cleaned-up inactive order.
    pub fn best_ask(&self) -> Option<f64> {
        let state = self.state.read().expect("book lock poisoned");
        top_active_price(&state.asks)
    }

    /// `best_ask - best_bid`, or `None` if either side is currently empty.
    pub fn spread(&self) -> Option<f64> {
        let state = self.state.read().expect("book lock poisoned");
        let bid = top_active_price(&state.bids)?;
        let ask = top_active_price(&state.asks)?;
        Some(ask - bid)
    }

    /// `(bid_count, ask_count)`: the number of currently active resting
    /// orders on each side. Unlike the top-of-book queries, this inspects
    /// every entry, including ones deeper than the top that are inactive but
    /// not yet physically removed, so it is O(n) in book size rather than O(1).
    pub fn depth(&self) -> (usize, usize) {
        let state = self.state.read().expect("book lock poisoned");
        let bids = state
            .bids
            .iter()
            .filter(|e| e.order().lock().expect("order mutex poisoned").is_active())
            .count();
        let asks = state
            .asks
            .iter()
            .filter(|e| e.order().lock().expect("order mutex poisoned").is_active())
            .count();
        (bids, asks)
    }
}

/// Peeks the top of `heap` without mutating it. Returns `None` if the heap
/// is empty or its top entry is inactive (cancelled/filled but not yet
/// physically removed) — the reader contract forbids popping it here.
fn top_active_price<T: BookEntry>(heap: &BinaryHeap<T>) -> Option<f64> {
    let top = heap.peek()?;
    let active = top.order().lock().expect("order mutex poisoned").is_active();
    active.then(|| top.price())
}
