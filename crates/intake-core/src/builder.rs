//! Order builder: parsed message -> order draft.

use intake_models::{NewOrder, NewOrderItem, OrderStatus, ParsedOrder};
use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::validation::{is_valid_email, is_valid_phone};

/// Comment written on the creation history record.
pub const CREATION_COMMENT: &str = "Order created from user message";

/// Builds an order draft from a parsed customer message.
///
/// Each requested item is priced against the catalog: unknown or
/// out-of-stock items are flagged unavailable and still priced at the
/// listed price when one is known, zero otherwise. Unavailable items
/// contribute to the total like any other (kept from the source system;
/// see DESIGN.md).
///
/// Initial status, in priority order: invalid email or phone ->
/// `InvalidContact`; any unavailable item -> `OutOfStock`; otherwise
/// `Pending`. The contact check wins when both conditions hold.
pub fn build_order(raw_text: &str, parsed: &ParsedOrder, catalog: &Catalog) -> NewOrder {
    let email = parsed.contact_email.as_deref().unwrap_or("");
    let phone = parsed.contact_phone.as_deref().unwrap_or("");
    let email_ok = is_valid_email(email);
    let phone_ok = is_valid_phone(phone);

    let mut items = Vec::with_capacity(parsed.items.len());
    let mut all_in_stock = true;

    for requested in &parsed.items {
        let product = catalog.lookup(&requested.name);
        let available = product.map(|p| p.in_stock).unwrap_or(false);
        if !available {
            all_in_stock = false;
        }
        let unit_price = product.map(|p| p.price).unwrap_or(Decimal::ZERO);
        items.push(NewOrderItem::new(
            requested.name.clone(),
            requested.quantity,
            unit_price,
            available,
        ));
    }

    let total_amount: Decimal = items.iter().map(|item| item.line_amount).sum();

    let status = if !email_ok || !phone_ok {
        OrderStatus::InvalidContact
    } else if !all_in_stock {
        OrderStatus::OutOfStock
    } else {
        OrderStatus::Pending
    };

    NewOrder {
        status,
        delivery_address: parsed.delivery_address.clone(),
        contact_email: parsed.contact_email.clone(),
        contact_phone: parsed.contact_phone.clone(),
        total_amount,
        source_message: raw_text.to_string(),
        items,
        email_ok,
        phone_ok,
        all_in_stock,
    }
}
