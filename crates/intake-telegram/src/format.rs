//! Plain-text rendering of orders and metrics for chat replies.

use intake_core::{DeliveryMetrics, SalesMetrics};
use intake_models::{NewOrder, Order};

/// One-line order summary for `/orders`.
pub fn format_order_short(order: &Order) -> String {
    format!(
        "#{} | {} | {} | {}",
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.status,
        order.total_amount
    )
}

/// Full order details for `/order <id>`.
pub fn format_order_full(order: &Order) -> String {
    let mut lines = vec![
        format!("Order #{}", order.id),
        format!("Created: {}", order.created_at.format("%Y-%m-%d %H:%M")),
        format!("Status: {}", order.status),
        format!("Total: {}", order.total_amount),
    ];

    if let Some(address) = &order.delivery_address {
        lines.push(format!("Address: {address}"));
    }
    if order.contact_email.is_some() || order.contact_phone.is_some() {
        lines.push("Contacts:".to_string());
        if let Some(email) = &order.contact_email {
            lines.push(format!("  - Email: {email}"));
        }
        if let Some(phone) = &order.contact_phone {
            lines.push(format!("  - Phone: {phone}"));
        }
    }

    if !order.items.is_empty() {
        lines.push(String::new());
        lines.push("Items:".to_string());
        for item in &order.items {
            lines.push(format!(
                "  - {} x{} = {}",
                item.name, item.quantity, item.line_amount
            ));
        }
    }

    if order.expected_delivery_date.is_some() || order.actual_delivery_date.is_some() {
        lines.push(String::new());
        if let Some(expected) = order.expected_delivery_date {
            lines.push(format!("Expected delivery: {}", expected.format("%Y-%m-%d")));
        }
        if let Some(actual) = order.actual_delivery_date {
            lines.push(format!("Actual delivery: {}", actual.format("%Y-%m-%d")));
        }
    }

    lines.join("\n")
}

/// Reply sent to the customer after their order was accepted.
///
/// The draft carries the derived validity flags; each failed check adds a
/// warning line but never blocks the order.
pub fn format_intake_reply(order: &Order, draft: &NewOrder) -> String {
    let mut lines = vec![
        format!("Your order #{} has been accepted.", order.id),
        format!("Status: {}", order.status),
        format!("Total: {}", order.total_amount),
    ];

    if !draft.email_ok {
        lines.push(
            "Warning: the email looks invalid - a manager may ask you for it again.".to_string(),
        );
    }
    if !draft.phone_ok {
        lines.push(
            "Warning: the phone looks invalid - a manager may reach you another way.".to_string(),
        );
    }
    if !draft.all_in_stock {
        lines.push(
            "Warning: some items may be out of stock - a manager will contact you.".to_string(),
        );
    }

    lines.join("\n")
}

/// Metrics report for `/stats`.
pub fn format_stats(days: i64, sales: &SalesMetrics, delivery: &DeliveryMetrics) -> String {
    let mut lines = vec![
        format!("Statistics for the last {days} days:"),
        String::new(),
        "Sales:".to_string(),
        format!("  - Orders: {}", sales.total_orders),
        format!("  - Revenue: {}", sales.total_revenue),
    ];

    if !sales.by_day.is_empty() {
        lines.push("  - By day:".to_string());
        for bucket in &sales.by_day {
            lines.push(format!(
                "    {} : {} orders, {}",
                bucket.date, bucket.orders, bucket.revenue
            ));
        }
    }

    lines.push(String::new());
    lines.push("Delivery:".to_string());
    match delivery.avg_delay_days {
        Some(avg) => lines.push(format!("  - Average delay: {avg:.2} days")),
        None => lines.push("  - Average delay: no delivered orders yet".to_string()),
    }
    lines.push(format!(
        "  - On time: {}, late: {}",
        delivery.on_time, delivery.late
    ));

    lines.join("\n")
}
