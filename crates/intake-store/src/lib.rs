//! Persistence for the intake pipeline.
//!
//! Two [`intake_core::OrderStore`] implementations:
//!
//! - [`PgOrderStore`] - Postgres over `sqlx`, with an embedded schema and
//!   one transaction per creation/transition
//! - [`MemoryOrderStore`] - in-memory store for tests and local demos
//!
//! Both enforce the same atomicity contract: a failed creation or
//! transition leaves no partial state behind.

pub mod memory;
pub mod postgres;

pub use memory::MemoryOrderStore;
pub use postgres::PgOrderStore;
