//! Best-effort notifier sinks for order events.
//!
//! Every sink implements [`Notifier`]; the bot layer drives a
//! [`NotifierSet`] after each core mutation. Sink failures are logged and
//! swallowed - they must never roll back or delay an order mutation.

pub mod email;
pub mod render;
pub mod sheets;

use async_trait::async_trait;
use intake_models::Order;
use thiserror::Error;
use tracing::warn;

pub use email::EmailNotifier;
pub use sheets::SheetsNotifier;

/// Errors a notifier sink can fail with. Always recovered by the caller.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP-level failure talking to a sink.
    #[error("HTTP error: {0}")]
    Http(String),

    /// SMTP-level failure.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Sink misconfiguration, e.g. an unparseable mailbox address.
    #[error("notifier configuration error: {0}")]
    Config(String),
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// A sink that mirrors order events somewhere outside the pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Called once after an order is created.
    async fn order_created(&self, order: &Order) -> Result<()>;

    /// Called after every status transition.
    async fn order_updated(&self, order: &Order) -> Result<()>;
}

/// A uniform fan-out over any number of sinks.
///
/// Failures are logged per sink and never propagate; an empty set is a
/// valid (silent) configuration.
#[derive(Default)]
pub struct NotifierSet {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    pub fn push(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of configured sinks.
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// True when no sinks are configured.
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Announces a created order to every sink, best-effort.
    pub async fn notify_created(&self, order: &Order) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.order_created(order).await {
                warn!(
                    notifier = notifier.name(),
                    order_id = order.id,
                    error = %e,
                    "Notifier failed on order creation"
                );
            }
        }
    }

    /// Announces an updated order to every sink, best-effort.
    pub async fn notify_updated(&self, order: &Order) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.order_updated(order).await {
                warn!(
                    notifier = notifier.name(),
                    order_id = order.id,
                    error = %e,
                    "Notifier failed on order update"
                );
            }
        }
    }
}
