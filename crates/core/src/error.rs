//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: the operation (or the single document line)
/// that produced it is aborted and leaves no partial state behind. Storage
/// failures are not domain errors and live in the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input (non-positive qty, unknown invoice
    /// type, empty item list, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced product, customer, invoice or dispatch does not exist.
    #[error("{kind} not found: {code}")]
    NotFound { kind: &'static str, code: String },

    /// The referenced document exists but cannot take part in the operation
    /// (e.g. dispatching against a purchase invoice).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A dispatch line would push the dispatched total past the ordered
    /// quantity.
    #[error("exceeds ordered amount for {product_code}: allowed = {remaining}")]
    ExceedsOrder { product_code: String, remaining: i64 },

    /// A decrement would drive on-hand quantity below zero.
    #[error("not enough stock for {product_code}: available {available}, requested {requested}")]
    InsufficientStock {
        product_code: String,
        available: i64,
        requested: i64,
    },

    /// A unique key is already taken (duplicate product/customer code).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, code: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            code: code.into(),
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn exceeds_order(product_code: impl Into<String>, remaining: i64) -> Self {
        Self::ExceedsOrder {
            product_code: product_code.into(),
            remaining,
        }
    }

    pub fn insufficient_stock(
        product_code: impl Into<String>,
        available: i64,
        requested: i64,
    ) -> Self {
        Self::InsufficientStock {
            product_code: product_code.into(),
            available,
            requested,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
