//! In-memory order store for tests and local demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake_core::builder::CREATION_COMMENT;
use intake_core::error::StoreError;
use intake_core::lifecycle::{apply_plan, TransitionPlan};
use intake_core::store::OrderStore;
use intake_models::{NewOrder, Order, OrderItem, StatusHistory};

#[derive(Default)]
struct Inner {
    next_id: i64,
    orders: HashMap<i64, Order>,
}

/// Thread-safe in-memory store with the same atomicity semantics as the
/// Postgres one: every mutation happens under one lock acquisition.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create_order(&self, draft: &NewOrder) -> Result<Order, StoreError> {
        let now = Utc::now();
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = inner.next_id;

        let items = draft
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| OrderItem {
                id: i as i64 + 1,
                order_id: id,
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_amount: item.line_amount,
            })
            .collect();

        let order = Order {
            id,
            created_at: now,
            updated_at: now,
            status: draft.status.clone(),
            delivery_address: draft.delivery_address.clone(),
            contact_email: draft.contact_email.clone(),
            contact_phone: draft.contact_phone.clone(),
            total_amount: draft.total_amount,
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: draft.source_message.clone(),
            items,
            history: vec![StatusHistory {
                old_status: None,
                new_status: draft.status.clone(),
                changed_at: now,
                comment: Some(CREATION_COMMENT.to_string()),
            }],
        };

        inner.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Order, StoreError> {
        let inner = self.lock()?;
        inner.orders.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let inner = self.lock()?;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn orders_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>, StoreError> {
        let inner = self.lock()?;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.created_at >= cutoff)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn apply_transition(&self, id: i64, plan: &TransitionPlan) -> Result<Order, StoreError> {
        let mut inner = self.lock()?;
        let order = inner.orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        apply_plan(order, plan);
        Ok(order.clone())
    }
}
