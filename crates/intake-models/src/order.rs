//! Order aggregate and its children.
//!
//! An [`Order`] exclusively owns its [`OrderItem`]s (created with the order,
//! never modified afterward) and its [`StatusHistory`] entries (append-only).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned identifier, immutable after creation.
    pub id: i64,

    /// When the order was created.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Free-text delivery address, as the customer wrote it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,

    /// Contact email; validity is derived, not enforced at write time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Contact phone; validity is derived, not enforced at write time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    /// Sum of the line amounts, fixed at creation.
    pub total_amount: Decimal,

    /// Date the manager promised delivery by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,

    /// Set automatically on the first transition to delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery_date: Option<DateTime<Utc>>,

    /// The original customer message, verbatim, for audit.
    pub source_message: String,

    /// Line items, created atomically with the order.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Append-only status change log, oldest first.
    #[serde(default)]
    pub history: Vec<StatusHistory>,
}

impl Order {
    /// Refreshes the mutation timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Sum of the line amounts; equals `total_amount` by construction.
    pub fn line_total(&self) -> Decimal {
        self.items.iter().map(|item| item.line_amount).sum()
    }
}

/// A line item attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Store-assigned identifier.
    pub id: i64,

    /// Owning order.
    pub order_id: i64,

    /// Product name as requested.
    pub name: String,

    /// Requested quantity, positive by the parser contract.
    pub quantity: u32,

    /// Catalog unit price at creation time.
    pub unit_price: Decimal,

    /// `unit_price * quantity`, computed once at creation.
    pub line_amount: Decimal,
}

/// One entry in an order's status change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistory {
    /// Status before the change; `None` only on the creation record.
    pub old_status: Option<OrderStatus>,

    /// Status after the change.
    pub new_status: OrderStatus,

    /// When the change happened.
    pub changed_at: DateTime<Utc>,

    /// Operator- or system-supplied note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A draft order produced by the order builder, before the store assigns
/// an id and timestamps.
///
/// The `email_ok`/`phone_ok`/`all_in_stock` flags are derived at build time
/// and are not persisted; the intake bot uses them to warn the customer.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Initial lifecycle status.
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Sum of the draft line amounts.
    pub total_amount: Decimal,
    /// The original customer message, verbatim.
    pub source_message: String,
    /// Draft line items, one per requested product.
    pub items: Vec<NewOrderItem>,
    pub email_ok: bool,
    pub phone_ok: bool,
    pub all_in_stock: bool,
}

/// A draft line item with its availability flag.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// `unit_price * quantity`, fixed here and never recomputed.
    pub line_amount: Decimal,
    /// Whether the catalog had the item in stock at build time.
    pub available: bool,
}

impl NewOrderItem {
    /// Creates a draft item, computing its line amount.
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal, available: bool) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            line_amount: unit_price * Decimal::from(quantity),
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_new_item_computes_line_amount() {
        let item = NewOrderItem::new("iPhone 15", 2, dec!(999.99), true);
        assert_eq!(item.line_amount, dec!(1999.98));
    }

    #[test]
    fn test_line_total_sums_items() {
        let now = Utc::now();
        let order = Order {
            id: 1,
            created_at: now,
            updated_at: now,
            status: OrderStatus::Pending,
            delivery_address: None,
            contact_email: None,
            contact_phone: None,
            total_amount: dec!(30.00),
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: "two plus one".to_string(),
            items: vec![
                OrderItem {
                    id: 1,
                    order_id: 1,
                    name: "a".to_string(),
                    quantity: 2,
                    unit_price: dec!(10.00),
                    line_amount: dec!(20.00),
                },
                OrderItem {
                    id: 2,
                    order_id: 1,
                    name: "b".to_string(),
                    quantity: 1,
                    unit_price: dec!(10.00),
                    line_amount: dec!(10.00),
                },
            ],
            history: Vec::new(),
        };

        assert_eq!(order.line_total(), order.total_amount);
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let now = Utc::now();
        let order = Order {
            id: 7,
            created_at: now,
            updated_at: now,
            status: OrderStatus::Custom("on_hold".to_string()),
            delivery_address: Some("Lenina 15".to_string()),
            contact_email: Some("a@b.c".to_string()),
            contact_phone: None,
            total_amount: dec!(175.50),
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: "msg".to_string(),
            items: Vec::new(),
            history: vec![StatusHistory {
                old_status: None,
                new_status: OrderStatus::Pending,
                changed_at: now,
                comment: Some("Order created from user message".to_string()),
            }],
        };

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, order.id);
        assert_eq!(back.status, order.status);
        assert_eq!(back.total_amount, order.total_amount);
        assert_eq!(back.history.len(), 1);
        assert!(back.history[0].old_status.is_none());
    }
}
