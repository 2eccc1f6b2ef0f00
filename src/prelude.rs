//! Commonly used types, re-exported for `use matching_core::prelude::*;`.

// Core order types
pub use crate::order::{Order, OrderFactory, OrderStatus, OrderType, Side, DEFAULT_MAX_PRICE};

// Order book
pub use crate::book::OrderBook;

// Gateway and its error types
pub use crate::gateway::{CancelError, Gateway, GatewayConfig, RejectionError, RejectionReason};

// Trades and the trade log
pub use crate::trade::{Trade, TradeLog};

// Id allocation
pub use crate::id::{IdAllocator, Sequencer};

// Clock abstraction
pub use crate::clock::{Clock, ManualClock, SystemClock};
