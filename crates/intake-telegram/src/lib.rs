//! Telegram bots for the order intake pipeline.
//!
//! Two bots share one process binary:
//!
//! - the **intake bot** receives free-text order messages, runs them
//!   through the AI parser and the order builder, persists the result and
//!   mirrors it to the configured notifier sinks
//! - the **admin bot** is the operator surface: list recent orders,
//!   inspect one, change its status (driving the lifecycle engine) and
//!   query sales/delivery metrics
//!
//! # Environment Variables
//!
//! Required:
//! - `DATABASE_URL`: Postgres connection string
//! - `TELEGRAM_INTAKE_BOT_TOKEN` / `TELEGRAM_ADMIN_BOT_TOKEN`: token for
//!   the bot role being started
//!
//! Optional:
//! - `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`: AI parser (intake role)
//! - `ADMIN_CHAT_IDS`: comma-separated allow-list; empty allows everyone
//! - `CATALOG_PATH`: JSON product catalog; a built-in demo is used otherwise
//! - `SHEETS_SPREADSHEET_ID`, `SHEETS_API_TOKEN`: spreadsheet mirror
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD`,
//!   `ORDER_NOTIFICATION_EMAIL`: email notifications

pub mod bot;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod handlers;

pub use config::Config;
pub use context::AppContext;
pub use error::{BotError, Result};
