//! Error types for the bot binary.

use thiserror::Error;

/// Errors that stop a bot from starting or serving.
#[derive(Debug, Error)]
pub enum BotError {
    /// A required environment variable is missing.
    #[error("{0} not set. Set the environment variable (see README).")]
    MissingEnv(&'static str),

    /// Configuration present but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Core pipeline error.
    #[error(transparent)]
    Core(#[from] intake_core::CoreError),

    /// AI parser error.
    #[error("parser error: {0}")]
    Parser(#[from] intake_parser::ParserError),

    /// Notifier setup error.
    #[error("notifier error: {0}")]
    Notify(#[from] intake_notify::NotifyError),
}

/// Result type for bot setup and orchestration.
pub type Result<T> = std::result::Result<T, BotError>;

impl From<intake_core::error::StoreError> for BotError {
    fn from(e: intake_core::error::StoreError) -> Self {
        BotError::Core(e.into())
    }
}

impl From<intake_core::catalog::CatalogError> for BotError {
    fn from(e: intake_core::catalog::CatalogError) -> Self {
        BotError::Config(e.to_string())
    }
}
