//! Shared text rendering for notifier sinks.

use chrono::{DateTime, Utc};
use intake_models::Order;

/// `"name x2; other x1"` summary of an order's items.
pub fn items_summary(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| format!("{} x{}", item.name, item.quantity))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `YYYY-MM-DD HH:MM:SS`, or empty for `None`.
pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use intake_models::{OrderItem, OrderStatus};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_items_summary_joins_with_semicolons() {
        let now = Utc::now();
        let order = Order {
            id: 1,
            created_at: now,
            updated_at: now,
            status: OrderStatus::Pending,
            delivery_address: None,
            contact_email: None,
            contact_phone: None,
            total_amount: dec!(0),
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: String::new(),
            items: vec![
                OrderItem {
                    id: 1,
                    order_id: 1,
                    name: "iPhone 15".to_string(),
                    quantity: 2,
                    unit_price: dec!(999.99),
                    line_amount: dec!(1999.98),
                },
                OrderItem {
                    id: 2,
                    order_id: 1,
                    name: "AirPods Pro".to_string(),
                    quantity: 1,
                    unit_price: dec!(249.90),
                    line_amount: dec!(249.90),
                },
            ],
            history: Vec::new(),
        };

        assert_eq!(items_summary(&order), "iPhone 15 x2; AirPods Pro x1");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        assert_eq!(format_datetime(Some(dt)), "2025-01-10 09:30:00");
        assert_eq!(format_datetime(None), "");
    }
}
