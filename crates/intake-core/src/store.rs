//! Storage boundary for orders.
//!
//! The core never talks SQL; it drives this trait. Implementations live in
//! `intake-store` (Postgres for production, in-memory for tests) and must
//! make each method one atomic unit: on failure, nothing is visible.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake_models::{NewOrder, Order};

use crate::error::StoreError;
use crate::lifecycle::TransitionPlan;

/// Transactional order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a draft with its items and the creation history record
    /// (`old_status = None`) as one atomic unit, returning the stored
    /// aggregate with its assigned id and timestamps.
    async fn create_order(&self, draft: &NewOrder) -> Result<Order, StoreError>;

    /// Fetches one order with its items and full history.
    async fn get_order(&self, id: i64) -> Result<Order, StoreError>;

    /// Most recently created orders, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Order>, StoreError>;

    /// All orders created at or after `cutoff`.
    async fn orders_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>, StoreError>;

    /// Applies a planned transition - status, dates, `updated_at` and the
    /// appended history record - as one atomic unit.
    async fn apply_transition(&self, id: i64, plan: &TransitionPlan) -> Result<Order, StoreError>;
}
