//! End-to-end order flow against the in-memory store: build, persist,
//! transition, query metrics.

use chrono::{TimeZone, Utc};
use intake_core::{build_order, Catalog, CoreError, OrderService};
use intake_models::{OrderStatus, ParsedItem, ParsedOrder};
use intake_store::MemoryOrderStore;
use rust_decimal_macros::dec;

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert("Widget", dec!(100.00), true);
    catalog.insert("Gadget", dec!(50.00), true);
    catalog
}

fn parsed(items: Vec<(&str, u32)>) -> ParsedOrder {
    ParsedOrder {
        items: items
            .into_iter()
            .map(|(name, quantity)| ParsedItem { name: name.to_string(), quantity })
            .collect(),
        delivery_address: Some("Lenina 15, kv 44".to_string()),
        contact_email: Some("ivanov@mail.ru".to_string()),
        contact_phone: Some("+79161234567".to_string()),
    }
}

#[tokio::test]
async fn test_create_then_transition_keeps_history_consistent() {
    let service = OrderService::new(MemoryOrderStore::new());

    let draft = build_order("order text", &parsed(vec![("Widget", 1)]), &catalog());
    let order = service.create_order(&draft).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.line_total(), order.total_amount);

    let order = service
        .set_status(order.id, "confirmed", None, Some("manager ok".to_string()))
        .await
        .unwrap();
    let eta = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
    let order = service.set_status(order.id, "shipped", Some(eta), None).await.unwrap();
    let order = service.set_status(order.id, "delivered", None, None).await.unwrap();

    // 1 creation record + 3 transitions.
    assert_eq!(order.history.len(), 4);
    assert!(order.history[0].old_status.is_none());
    for pair in order.history.windows(2) {
        assert_eq!(pair[1].old_status.as_ref(), Some(&pair[0].new_status));
    }
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.expected_delivery_date, Some(eta));
    assert!(order.actual_delivery_date.is_some());
}

#[tokio::test]
async fn test_delivered_twice_keeps_first_actual_date() {
    let service = OrderService::new(MemoryOrderStore::new());
    let draft = build_order("text", &parsed(vec![("Widget", 1)]), &catalog());
    let order = service.create_order(&draft).await.unwrap();

    let delivered = service.set_status(order.id, "delivered", None, None).await.unwrap();
    let first_actual = delivered.actual_delivery_date.unwrap();

    let redelivered = service.set_status(order.id, "delivered", None, None).await.unwrap();
    assert_eq!(redelivered.actual_delivery_date, Some(first_actual));
    assert_eq!(redelivered.history.len(), 3);
}

#[tokio::test]
async fn test_unknown_status_label_is_stored_verbatim() {
    let service = OrderService::new(MemoryOrderStore::new());
    let draft = build_order("text", &parsed(vec![("Widget", 1)]), &catalog());
    let order = service.create_order(&draft).await.unwrap();

    let updated = service.set_status(order.id, "on_hold", None, None).await.unwrap();
    assert_eq!(updated.status, OrderStatus::Custom("on_hold".to_string()));
    assert!(updated.actual_delivery_date.is_none());
}

#[tokio::test]
async fn test_transition_on_missing_order_is_not_found() {
    let service = OrderService::new(MemoryOrderStore::new());
    let err = service.set_status(999, "confirmed", None, None).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(999)));
}

#[tokio::test]
async fn test_sales_metrics_over_created_orders() {
    let service = OrderService::new(MemoryOrderStore::new());
    let catalog = catalog();

    for items in [vec![("Widget", 1)], vec![("Gadget", 1)], vec![("Gadget", 1), ("Widget", 1)]] {
        let draft = build_order("text", &parsed(items), &catalog);
        service.create_order(&draft).await.unwrap();
    }

    let sales = service.sales_metrics(30).await.unwrap();
    assert_eq!(sales.total_orders, 3);
    assert_eq!(sales.total_revenue, dec!(300.00));
    assert_eq!(sales.by_day.len(), 1);
    assert_eq!(sales.by_day[0].date, Utc::now().date_naive());

    let delivery = service.delivery_metrics(30).await.unwrap();
    assert_eq!(delivery.on_time + delivery.late, 0);
    assert_eq!(delivery.avg_delay_days, None);
}

#[tokio::test]
async fn test_delivery_metrics_counts_only_fully_dated_orders() {
    let service = OrderService::new(MemoryOrderStore::new());
    let catalog = catalog();

    let draft = build_order("text", &parsed(vec![("Widget", 1)]), &catalog);
    let order = service.create_order(&draft).await.unwrap();

    // Promise delivery for yesterday, deliver today: one day late.
    let yesterday = Utc::now().date_naive().pred_opt().unwrap();
    let eta = Utc
        .from_utc_datetime(&yesterday.and_hms_opt(0, 0, 0).unwrap());
    service.set_status(order.id, "shipped", Some(eta), None).await.unwrap();
    service.set_status(order.id, "delivered", None, None).await.unwrap();

    // A second order that never ships contributes nothing.
    let draft = build_order("text", &parsed(vec![("Gadget", 1)]), &catalog);
    service.create_order(&draft).await.unwrap();

    let delivery = service.delivery_metrics(30).await.unwrap();
    assert_eq!(delivery.late, 1);
    assert_eq!(delivery.on_time, 0);
    assert_eq!(delivery.avg_delay_days, Some(1.0));
}
