//! Shared state across bot handlers.

use intake_core::{Catalog, OrderService};
use intake_notify::NotifierSet;
use intake_parser::OrderParser;
use intake_store::PgOrderStore;

/// Everything a handler needs, assembled once at startup and shared via
/// `Arc`. All collaborators are explicit dependencies - nothing global.
pub struct AppContext {
    pub service: OrderService<PgOrderStore>,
    /// AI parser; only the intake role configures one.
    pub parser: Option<Box<dyn OrderParser>>,
    pub notifiers: NotifierSet,
    pub catalog: Catalog,
    admin_chat_ids: Vec<i64>,
}

impl AppContext {
    /// Assembles the context.
    pub fn new(
        service: OrderService<PgOrderStore>,
        parser: Option<Box<dyn OrderParser>>,
        notifiers: NotifierSet,
        catalog: Catalog,
        admin_chat_ids: Vec<i64>,
    ) -> Self {
        Self { service, parser, notifiers, catalog, admin_chat_ids }
    }

    /// Trivial allow-list check; an empty list allows everyone.
    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_ids.is_empty() || self.admin_chat_ids.contains(&chat_id)
    }
}
