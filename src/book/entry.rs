//! Heap entry types encoding each side's price-time priority as a `Ord` impl.

use crate::order::Order;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

/// A resting order as seen by the book: shared ownership between its heap
/// entry and the id index, with interior mutability scoped to updates made
/// while the book's writer lock is held.
pub(crate) type RestingOrder = Arc<Mutex<Order>>;

/// Common surface over [`BidEntry`]/[`AskEntry`] that the matching loop uses
/// generically, so the drain logic is written once and reused for both
/// sides instead of duplicated per-side.
pub(crate) trait BookEntry: Ord {
    /// The cached limit price, avoiding a lock just to compare priorities.
    fn price(&self) -> f64;
    /// The cached order id, avoiding a lock to label trades/index removals.
    fn id(&self) -> u64;
    /// The shared, lockable order this entry represents.
    fn order(&self) -> &RestingOrder;
}

/// A total order over `f64` via [`f64::total_cmp`].
///
/// Prices reaching the heap have already passed gateway validation
/// (`price > 0`, finite, `<=` the configured ceiling), so NaN never appears
/// here in practice; `total_cmp` is used anyway so that comparisons are a
/// true total order rather than relying on that invariant for safety.
#[inline]
fn cmp_price(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Heap entry for the bid (buy) side: higher price is better, ties broken
/// by earlier timestamp. Caches `price`/`timestamp`/`id` so the heap can
/// compare entries without locking the underlying order on every sift.
pub(crate) struct BidEntry {
    pub price: f64,
    pub timestamp: i64,
    pub id: u64,
    pub order: RestingOrder,
}

impl BookEntry for BidEntry {
    fn price(&self) -> f64 {
        self.price
    }
    fn id(&self) -> u64 {
        self.id
    }
    fn order(&self) -> &RestingOrder {
        &self.order
    }
}

impl PartialEq for BidEntry {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price && self.timestamp == other.timestamp && self.id == other.id
    }
}
impl Eq for BidEntry {}

impl Ord for BidEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; the greatest element here must be the
        // one with highest priority: highest price, then earliest timestamp.
        cmp_price(self.price, other.price)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for BidEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Heap entry for the ask (sell) side: lower price is better, ties broken
/// by earlier timestamp.
pub(crate) struct AskEntry {
    pub price: f64,
    pub timestamp: i64,
    pub id: u64,
    pub order: RestingOrder,
}

impl BookEntry for AskEntry {
    fn price(&self) -> f64 {
        self.price
    }
    fn id(&self) -> u64 {
        self.id
    }
    fn order(&self) -> &RestingOrder {
        &self.order
    }
}

impl PartialEq for AskEntry {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price && self.timestamp == other.timestamp && self.id == other.id
    }
}
impl Eq for AskEntry {}

impl Ord for AskEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the greatest element must have lowest price, then
        // earliest timestamp.
        cmp_price(other.price, self.price)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for AskEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Side;
    use std::collections::BinaryHeap;

    fn resting(id: u64, price: f64, ts: i64) -> RestingOrder {
        Arc::new(Mutex::new(Order::new_limit(id, "AAPL", Side::Buy, price, 10, ts)))
    }

    #[test]
    fn bid_heap_pops_highest_price_first() {
        let mut heap = BinaryHeap::new();
        heap.push(BidEntry { price: 100.0, timestamp: 1, id: 1, order: resting(1, 100.0, 1) });
        heap.push(BidEntry { price: 105.0, timestamp: 2, id: 2, order: resting(2, 105.0, 2) });
        heap.push(BidEntry { price: 99.0, timestamp: 3, id: 3, order: resting(3, 99.0, 3) });

        assert_eq!(heap.pop().unwrap().price, 105.0);
        assert_eq!(heap.pop().unwrap().price, 100.0);
        assert_eq!(heap.pop().unwrap().price, 99.0);
    }

    #[test]
    fn bid_heap_breaks_ties_by_earlier_timestamp() {
        let mut heap = BinaryHeap::new();
        heap.push(BidEntry { price: 100.0, timestamp: 5, id: 1, order: resting(1, 100.0, 5) });
        heap.push(BidEntry { price: 100.0, timestamp: 2, id: 2, order: resting(2, 100.0, 2) });

        assert_eq!(heap.pop().unwrap().timestamp, 2);
        assert_eq!(heap.pop().unwrap().timestamp, 5);
    }

    #[test]
    fn ask_heap_pops_lowest_price_first() {
        let mut heap = BinaryHeap::new();
        heap.push(AskEntry { price: 190.0, timestamp: 1, id: 1, order: resting(1, 190.0, 1) });
        heap.push(AskEntry { price: 188.0, timestamp: 2, id: 2, order: resting(2, 188.0, 2) });
        heap.push(AskEntry { price: 191.0, timestamp: 3, id: 3, order: resting(3, 191.0, 3) });

        assert_eq!(heap.pop().unwrap().price, 188.0);
        assert_eq!(heap.pop().unwrap().price, 190.0);
        assert_eq!(heap.pop().unwrap().price, 191.0);
    }

    #[test]
    fn ask_heap_breaks_ties_by_earlier_timestamp() {
        let mut heap = BinaryHeap::new();
        heap.push(AskEntry { price: 190.0, timestamp: 9, id: 1, order: resting(1, 190.0, 9) });
        heap.push(AskEntry { price: 190.0, timestamp: 4, id: 2, order: resting(2, 190.0, 4) });

        assert_eq!(heap.pop().unwrap().timestamp, 4);
        assert_eq!(heap.pop().unwrap().timestamp, 9);
    }
}
