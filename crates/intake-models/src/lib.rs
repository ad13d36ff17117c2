//! Data model for the order intake pipeline.
//!
//! The aggregate root is [`Order`], which owns its line items and an
//! append-only status history. [`ParsedOrder`] is the contract with the
//! external text parser; [`NewOrder`] is the draft an order builder
//! produces before the store assigns an id.

pub mod order;
pub mod parsed;
pub mod status;

pub use order::{NewOrder, NewOrderItem, Order, OrderItem, StatusHistory};
pub use parsed::{ParsedItem, ParsedOrder};
pub use status::OrderStatus;
