//! Sales and delivery metrics over a trailing window.
//!
//! Pure functions over a slice of orders; the service layer feeds them
//! whatever the store returned. Passing `now` explicitly keeps the window
//! arithmetic deterministic under test.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use intake_models::Order;
use rust_decimal::Decimal;
use serde::Serialize;

/// Orders and revenue for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Sales totals over a window.
#[derive(Debug, Clone, Serialize)]
pub struct SalesMetrics {
    /// Exact decimal sum of order totals in the window.
    pub total_revenue: Decimal,
    pub total_orders: u64,
    /// Per-day buckets, ascending by date; days without orders are omitted.
    pub by_day: Vec<DayBucket>,
}

/// Delivery performance over a window.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryMetrics {
    /// Mean delay in days over contributing orders; `None` when none
    /// contributed (not zero).
    pub avg_delay_days: Option<f64>,
    pub on_time: u64,
    pub late: u64,
}

fn in_window(order: &Order, now: DateTime<Utc>, window_days: i64) -> bool {
    let cutoff = now - Duration::days(window_days);
    order.created_at >= cutoff && order.created_at <= now
}

/// Aggregates sales figures for orders created within the trailing window.
pub fn sales_metrics(orders: &[Order], now: DateTime<Utc>, window_days: i64) -> SalesMetrics {
    let mut total_revenue = Decimal::ZERO;
    let mut total_orders = 0u64;
    let mut by_day: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();

    for order in orders.iter().filter(|o| in_window(o, now, window_days)) {
        total_revenue += order.total_amount;
        total_orders += 1;
        let day = by_day.entry(order.created_at.date_naive()).or_insert((0, Decimal::ZERO));
        day.0 += 1;
        day.1 += order.total_amount;
    }

    SalesMetrics {
        total_revenue,
        total_orders,
        by_day: by_day
            .into_iter()
            .map(|(date, (orders, revenue))| DayBucket { date, orders, revenue })
            .collect(),
    }
}

/// Aggregates delivery performance for orders created within the window.
///
/// An order contributes only when both the expected and the actual delivery
/// date are set; time-of-day is discarded before the day subtraction.
pub fn delivery_metrics(orders: &[Order], now: DateTime<Utc>, window_days: i64) -> DeliveryMetrics {
    let mut delays: Vec<i64> = Vec::new();
    let mut on_time = 0u64;
    let mut late = 0u64;

    for order in orders.iter().filter(|o| in_window(o, now, window_days)) {
        let (Some(expected), Some(actual)) =
            (order.expected_delivery_date, order.actual_delivery_date)
        else {
            continue;
        };

        let delay = (actual.date_naive() - expected.date_naive()).num_days();
        delays.push(delay);
        if delay <= 0 {
            on_time += 1;
        } else {
            late += 1;
        }
    }

    let avg_delay_days = if delays.is_empty() {
        None
    } else {
        Some(delays.iter().sum::<i64>() as f64 / delays.len() as f64)
    };

    DeliveryMetrics { avg_delay_days, on_time, late }
}
