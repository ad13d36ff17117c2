//! Error types for the intake core.

use thiserror::Error;

/// Errors surfaced by the core to the command layer.
///
/// All of these are recovered at the bot boundary and turned into
/// user-facing messages; none of them leave partial state behind. Parser
/// failures are not part of this enum - the parser crate owns those, and a
/// parse failure stops the flow before the core is ever involved.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced order id does not exist.
    #[error("order #{0} not found")]
    NotFound(i64),

    /// Malformed operator input, e.g. a non-numeric id or unparseable date.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Storage backend failure; the whole atomic unit was aborted.
    #[error("storage error: {0}")]
    Store(String),
}

/// Errors produced by an [`crate::store::OrderStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced order id does not exist.
    #[error("order #{0} not found")]
    NotFound(i64),

    /// Anything the backend itself failed on, carried as text.
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CoreError::NotFound(id),
            StoreError::Backend(msg) => CoreError::Store(msg),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
