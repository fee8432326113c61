//! Model validation errors
//!
//! Raised when a remote record cannot be mapped onto the domain model.
//! Callers treat these the same way as a transport failure.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    #[error("unknown delivery type: {0}")]
    UnknownDeliveryType(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid quantity {quantity} for item {item_id}")]
    InvalidQuantity { item_id: i64, quantity: i64 },

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}
