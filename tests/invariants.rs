//! Property-based tests checking invariants 1, 2, 3, and 6 hold after every
//! step of a random sequence of valid submissions and cancellations.

use matching_core::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn price_strategy() -> impl Strategy<Value = f64> {
    (1i64..=1_000_00i64).prop_map(|cents| cents as f64 / 100.0)
}

fn quantity_strategy() -> impl Strategy<Value = u64> {
    1u64..=10_000u64
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn order_type_strategy() -> impl Strategy<Value = OrderType> {
    prop_oneof![Just(OrderType::Limit), Just(OrderType::Market), Just(OrderType::Ioc)]
}

#[derive(Debug, Clone)]
enum Action {
    Submit { side: Side, order_type: OrderType, price: f64, quantity: u64 },
    Cancel { nth_submitted: usize },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (side_strategy(), order_type_strategy(), price_strategy(), quantity_strategy())
            .prop_map(|(side, order_type, price, quantity)| Action::Submit { side, order_type, price, quantity }),
        1 => (0usize..200).prop_map(|nth_submitted| Action::Cancel { nth_submitted }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Invariants 1, 2, 3, and 6 hold after every step of a random sequence
    /// of submissions and cancellations against a single book.
    #[test]
    fn invariants_hold_after_every_step(actions in prop::collection::vec(action_strategy(), 1..80)) {
        let gateway = Gateway::new(["AAPL"], None);
        let mut submitted_ids: Vec<u64> = Vec::new();
        let mut seen_order_ids: HashSet<u64> = HashSet::new();
        let mut seen_trade_ids: HashSet<u64> = HashSet::new();
        let mut last_order_id = 0u64;
        let mut last_trade_id = 0u64;
        let mut buy_filled_total: u64 = 0;
        let mut sell_filled_total: u64 = 0;

        for action in actions {
            match action {
                Action::Submit { side, order_type, price, quantity } => {
                    let order = match order_type {
                        OrderType::Limit => gateway.factory().limit("AAPL", side, price, quantity),
                        OrderType::Market => gateway.factory().market("AAPL", side, quantity),
                        OrderType::Ioc => gateway.factory().ioc("AAPL", side, price, quantity),
                    };
                    let order_id = order.id();

                    // Invariant 6: order ids strictly increase.
                    prop_assert!(order_id > last_order_id, "order id did not strictly increase");
                    prop_assert!(seen_order_ids.insert(order_id), "order id {} reused", order_id);
                    last_order_id = order_id;

                    let Ok(trades) = gateway.submit(order) else {
                        continue;
                    };
                    submitted_ids.push(order_id);

                    for trade in &trades {
                        // Invariant 6: trade ids strictly increase.
                        prop_assert!(trade.id() > last_trade_id, "trade id did not strictly increase");
                        prop_assert!(seen_trade_ids.insert(trade.id()), "trade id {} reused", trade.id());
                        last_trade_id = trade.id();

                        buy_filled_total += trade.quantity();
                        sell_filled_total += trade.quantity();
                    }
                }
                Action::Cancel { nth_submitted } => {
                    if let Some(&id) = submitted_ids.get(nth_submitted % submitted_ids.len().max(1)) {
                        let _ = gateway.cancel("AAPL", id);
                    }
                }
            }

            let book = gateway.book("AAPL").unwrap();

            // Invariant 2: book never crosses at quiescence.
            if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
                prop_assert!(bid < ask, "crossed book: bid {} >= ask {}", bid, ask);
            }
        }

        // Invariant 3: buy-side and sell-side traded quantity always match,
        // since every trade fills exactly one unit of buy-side and sell-side
        // quantity simultaneously.
        prop_assert_eq!(buy_filled_total, sell_filled_total);
    }

    /// Invariant 1: an order's filled quantity never exceeds its original quantity.
    #[test]
    fn filled_never_exceeds_quantity(
        resting_qty in quantity_strategy(),
        incoming_qty in quantity_strategy(),
        price in price_strategy(),
    ) {
        let gateway = Gateway::new(["AAPL"], None);
        let sell = gateway.factory().limit("AAPL", Side::Sell, price, resting_qty);
        gateway.submit(sell).unwrap();

        let buy = gateway.factory().market("AAPL", Side::Buy, incoming_qty);
        let buy_id = buy.id();
        let trades = gateway.submit(buy).unwrap();

        let filled: u64 = trades.iter().map(|t| t.quantity()).sum();
        prop_assert!(filled <= incoming_qty, "order {} overfilled", buy_id);
        prop_assert!(filled <= resting_qty.max(incoming_qty));
    }
}
