//! The single validated entry point into the matching core.

use crate::book::OrderBook;
use crate::id::IdAllocator;
use crate::order::{Order, OrderFactory, OrderType, Side, DEFAULT_MAX_PRICE};
use crate::trade::{Trade, TradeLog};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a submitted order was rejected before reaching any book.
#[derive(Debug)]
#[non_exhaustive]
pub enum RejectionReason {
    /// Symbol was empty.
    EmptyField {
        /// The field that was empty.
        field: &'static str,
    },
    /// Symbol is not in the gateway's registered set.
    UnknownSymbol {
        /// The symbol that was not recognized.
        symbol: String,
    },
    /// Side or order type did not match a known variant.
    InvalidEnum {
        /// The field that held the invalid value.
        field: &'static str,
    },
    /// Quantity was not strictly positive.
    InvalidRange {
        /// The field that failed the range check.
        field: &'static str,
    },
    /// Price exceeded the configured fat-finger ceiling.
    OutOfBounds {
        /// The field that failed the bound check.
        field: &'static str,
        /// The offending value.
        value: f64,
        /// The configured ceiling it exceeded.
        limit: f64,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::EmptyField { field } => write!(f, "field '{field}' must not be empty"),
            RejectionReason::UnknownSymbol { symbol } => write!(f, "unknown symbol '{symbol}'"),
            RejectionReason::InvalidEnum { field } => write!(f, "field '{field}' is not a recognized value"),
            RejectionReason::InvalidRange { field } => write!(f, "field '{field}' must be greater than zero"),
            RejectionReason::OutOfBounds { field, value, limit } => {
                write!(f, "field '{field}' value {value} exceeds ceiling {limit}")
            }
        }
    }
}

/// Raised by [`Gateway::submit`] when validation fails. The order's status
/// has already been set to REJECTED; no book state was touched.
#[derive(Debug)]
pub struct RejectionError {
    reason: RejectionReason,
    order: Order,
}

impl RejectionError {
    /// Why the order was rejected.
    pub fn reason(&self) -> &RejectionReason {
        &self.reason
    }

    /// The rejected order, with status REJECTED.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Consumes the error, returning the rejected order.
    pub fn into_order(self) -> Order {
        self.order
    }
}

impl fmt::Display for RejectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order {} rejected: {}", self.order.id(), self.reason)
    }
}

impl std::error::Error for RejectionError {}

/// Raised by [`Gateway::cancel`] when the request cannot be routed or fails.
#[derive(Debug)]
#[non_exhaustive]
pub enum CancelError {
    /// No registered book for this symbol.
    UnknownSymbol(String),
    /// The book exists but the order id was not found, or was already terminal.
    NotFound(u64),
}

impl fmt::Display for CancelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelError::UnknownSymbol(symbol) => write!(f, "unknown symbol '{symbol}'"),
            CancelError::NotFound(id) => write!(f, "order {id} not found or already terminal"),
        }
    }
}

impl std::error::Error for CancelError {}

/// Construction-time validation configuration. Fixed for the gateway's
/// lifetime.
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    /// Upper bound on LIMIT/IOC price, the fat-finger guard.
    pub max_price: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { max_price: DEFAULT_MAX_PRICE }
    }
}

/// The validated entry point into the matching core.
///
/// Owns one [`OrderBook`] per registered symbol (the set is fixed at
/// construction), an [`OrderFactory`] for minting ids/timestamps, and an
/// optional [`TradeLog`] that every produced trade is appended to.
pub struct Gateway {
    books: HashMap<String, OrderBook>,
    trade_log: Option<Arc<TradeLog>>,
    factory: OrderFactory,
    config: GatewayConfig,
}

impl Gateway {
    /// Builds a gateway with a fresh book per listed symbol and the default
    /// validation configuration.
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>, trade_log: Option<Arc<TradeLog>>) -> Self {
        Self::with_config(symbols, trade_log, GatewayConfig::default())
    }

    /// Builds a gateway with an explicit [`GatewayConfig`].
    pub fn with_config(
        symbols: impl IntoIterator<Item = impl Into<String>>,
        trade_log: Option<Arc<TradeLog>>,
        config: GatewayConfig,
    ) -> Self {
        let ids = IdAllocator::shared();
        let clock = Arc::new(crate::clock::SystemClock::new());
        let books = symbols
            .into_iter()
            .map(|s| {
                let symbol = s.into();
                (symbol.clone(), OrderBook::new(symbol, Arc::clone(&ids)))
            })
            .collect();
        Self {
            books,
            trade_log,
            factory: OrderFactory::new(ids, clock),
            config,
        }
    }

    /// The set of registered symbols.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    /// Read-only accessor for a registered book's top-of-book/depth queries.
    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// The shared factory this gateway mints orders from, for callers that
    /// build an [`Order`] before calling [`Gateway::submit`].
    pub fn factory(&self) -> &OrderFactory {
        &self.factory
    }

    /// Validates, routes, and matches `order`. On success, every produced
    /// trade is appended to the trade log (if configured) and returned. On
    /// validation failure, `order`'s status is set to REJECTED and no book
    /// state is touched.
    pub fn submit(&self, mut order: Order) -> Result<Vec<Trade>, RejectionError> {
        if let Err(reason) = self.validate(&order) {
            order.mark_rejected();
            warn!(order_id = order.id(), reason = %reason, "order rejected");
            return Err(RejectionError { reason, order });
        }

        let book = self
            .books
            .get(order.symbol())
            .expect("symbol already validated against the registered set");
        let trades = book.submit(&mut order);

        if let Some(log) = &self.trade_log {
            log.add_all(trades.iter().cloned());
        }

        info!(
            order_id = order.id(),
            symbol = order.symbol(),
            trades = trades.len(),
            status = ?order.status(),
            "order accepted and routed"
        );

        Ok(trades)
    }

    /// Routes a cancel request to the named book.
    pub fn cancel(&self, symbol: &str, order_id: u64) -> Result<(), CancelError> {
        let book = self
            .books
            .get(symbol)
            .ok_or_else(|| CancelError::UnknownSymbol(symbol.to_string()))?;
        if book.cancel(order_id) {
            info!(order_id, symbol, "order cancelled");
            Ok(())
        } else {
            Err(CancelError::NotFound(order_id))
        }
    }

    fn validate(&self, order: &Order) -> Result<(), RejectionReason> {
        if order.symbol().is_empty() {
            return Err(RejectionReason::EmptyField { field: "symbol" });
        }
        if !self.books.contains_key(order.symbol()) {
            return Err(RejectionReason::UnknownSymbol { symbol: order.symbol().to_string() });
        }
        if !matches!(order.side(), Side::Buy | Side::Sell) {
            return Err(RejectionReason::InvalidEnum { field: "side" });
        }
        if !matches!(order.order_type(), OrderType::Limit | OrderType::Market | OrderType::Ioc) {
            return Err(RejectionReason::InvalidEnum { field: "type" });
        }
        if order.quantity() == 0 {
            return Err(RejectionReason::InvalidRange { field: "quantity" });
        }
        if matches!(order.order_type(), OrderType::Limit | OrderType::Ioc) {
            if !(order.price() > 0.0) {
                return Err(RejectionReason::InvalidRange { field: "price" });
            }
            if !(order.price() <= self.config.max_price) {
                return Err(RejectionReason::OutOfBounds {
                    field: "price",
                    value: order.price(),
                    limit: self.config.max_price,
                });
            }
        }
        Ok(())
    }
}
