//! Domain error model.

use thiserror::Error;

/// Result type used across the stock domain.
pub type StockResult<T> = Result<T, StockError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Expected conditions
/// (unknown id, disallowed transition, short stock) are returned, never
/// raised; the caller decides user-facing presentation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// A referenced entity is unknown.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier was reused on create.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Zero or negative where a positive (or non-negative) quantity is required.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Disallowed state change (e.g. purchase-order transition outside the graph).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A sale asked for more than the locations hold.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// A value failed validation (e.g. malformed or empty input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl StockError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn insufficient_stock(
        product: impl Into<String>,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
