//! Monotonic identifier allocation shared across producers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A strictly monotonically increasing 64-bit counter.
///
/// Each call to [`Sequencer::next`] returns a value strictly greater than
/// every value previously returned by the same instance, even when called
/// concurrently from multiple threads. The counter never fails; 63 bits of
/// headroom above any realistic call volume makes overflow a non-concern.
#[derive(Debug)]
pub struct Sequencer {
    counter: AtomicU64,
}

impl Sequencer {
    /// Creates a sequencer whose first `next()` call returns 1.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Allocates and returns the next value in the sequence.
    #[inline]
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of id sequences the engine needs: one for orders, one for
/// trades. Kept distinct so that order ids and trade ids never collide and
/// each sequence's monotonicity can be reasoned about independently.
#[derive(Debug, Default)]
pub struct IdAllocator {
    orders: Sequencer,
    trades: Sequencer,
}

impl IdAllocator {
    /// Creates a fresh allocator with both sequences starting at 1.
    pub fn new() -> Self {
        Self {
            orders: Sequencer::new(),
            trades: Sequencer::new(),
        }
    }

    /// Wraps a new allocator in an `Arc` for sharing across a [`crate::gateway::Gateway`]
    /// and the books it owns.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Allocates the next order id.
    #[inline]
    pub fn next_order_id(&self) -> u64 {
        self.orders.next()
    }

    /// Allocates the next trade id.
    #[inline]
    pub fn next_trade_id(&self) -> u64 {
        self.trades.next()
    }
}
