//! # Matching Core
//!
//! A single-venue, price-time priority limit order matching engine with
//! multi-symbol books, a validating gateway, and an append-only trade log.
//!
//! ## Key properties
//!
//! - **Price-time priority**: each book side is a priority queue ordered by
//!   price first, earliest arrival second.
//! - **Three order types**: `LIMIT` rests when unfilled, `MARKET` and `IOC`
//!   never rest — any residual is cancelled instead.
//! - **Passive pricing**: every trade executes at the resting order's price,
//!   never the incoming order's.
//! - **Per-book concurrency**: each [`book::OrderBook`] carries its own
//!   reader/writer lock; books for different symbols never block each other.
//!
//! ## Example
//!
//! ```
//! use matching_core::prelude::*;
//!
//! let gateway = Gateway::new(["AAPL"], Some(std::sync::Arc::new(TradeLog::new())));
//!
//! let sell = gateway.factory().limit("AAPL", Side::Sell, 190.0, 50);
//! gateway.submit(sell).unwrap();
//!
//! let buy = gateway.factory().limit("AAPL", Side::Buy, 191.0, 50);
//! let trades = gateway.submit(buy).unwrap();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].price(), 190.0);
//! ```
//!
//! ## Status
//!
//! Single-process, in-memory only: no persistence, no wire protocol, no
//! multi-venue routing. See `SPEC_FULL.md` in the repository for the full
//! list of things this engine deliberately does not do.

pub mod book;
pub mod clock;
pub mod gateway;
pub mod id;
pub mod order;
pub mod prelude;
pub mod trade;

pub use book::OrderBook;
pub use clock::{Clock, ManualClock, SystemClock};
pub use gateway::{CancelError, Gateway, GatewayConfig, RejectionError, RejectionReason};
pub use id::{IdAllocator, Sequencer};
pub use order::{Order, OrderFactory, OrderStatus, OrderType, Side, DEFAULT_MAX_PRICE};
pub use trade::{Trade, TradeLog};
