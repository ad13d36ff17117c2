//! Orchestration over a store: create orders, drive transitions, answer
//! metrics queries.
//!
//! The service owns no state beyond the store handle it was constructed
//! with; external notifiers are invoked by the caller with the returned
//! order, never from here.

use chrono::{Duration, Utc};
use intake_models::{NewOrder, Order};
use tracing::info;

use crate::error::Result;
use crate::lifecycle::plan_transition;
use crate::metrics::{self, DeliveryMetrics, SalesMetrics};
use crate::store::OrderStore;

/// Order operations bound to a concrete store.
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a built draft and returns the stored order.
    pub async fn create_order(&self, draft: &NewOrder) -> Result<Order> {
        let order = self.store.create_order(draft).await?;
        info!(
            order_id = order.id,
            status = %order.status,
            total = %order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    /// Fetches one order with items and history.
    pub async fn get_order(&self, id: i64) -> Result<Order> {
        Ok(self.store.get_order(id).await?)
    }

    /// Most recently created orders, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<Order>> {
        Ok(self.store.list_recent(limit).await?)
    }

    /// Transitions an order to the status named by `label`.
    ///
    /// Unrecognized labels are accepted and stored verbatim. A supplied
    /// expected delivery date overwrites the current one; transitioning to
    /// delivered stamps the actual delivery date exactly once.
    pub async fn set_status(
        &self,
        id: i64,
        label: &str,
        expected_delivery_date: Option<chrono::DateTime<Utc>>,
        comment: Option<String>,
    ) -> Result<Order> {
        let order = self.store.get_order(id).await?;
        let plan = plan_transition(&order, label, expected_delivery_date, comment, Utc::now());
        let updated = self.store.apply_transition(id, &plan).await?;
        info!(
            order_id = id,
            from = %plan.old_status,
            to = %plan.new_status,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Sales metrics over the trailing `window_days`.
    pub async fn sales_metrics(&self, window_days: i64) -> Result<SalesMetrics> {
        let now = Utc::now();
        let orders = self.store.orders_since(now - Duration::days(window_days)).await?;
        Ok(metrics::sales_metrics(&orders, now, window_days))
    }

    /// Delivery metrics over the trailing `window_days`.
    pub async fn delivery_metrics(&self, window_days: i64) -> Result<DeliveryMetrics> {
        let now = Utc::now();
        let orders = self.store.orders_since(now - Duration::days(window_days)).await?;
        Ok(metrics::delivery_metrics(&orders, now, window_days))
    }
}
