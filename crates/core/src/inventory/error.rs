//! Inventory error types.

use rust_decimal::Decimal;
use thiserror::Error;

use khata_shared::AppError;

use crate::store::StoreError;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Item not found by id or by account leaf name.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Quantity is zero.
    #[error("Stock quantity cannot be zero")]
    ZeroQuantity,

    /// Quantity sign contradicts the movement type.
    #[error("Quantity {quantity} has the wrong sign for a {kind} movement")]
    DirectionMismatch {
        /// Movement type.
        kind: String,
        /// Submitted quantity.
        quantity: Decimal,
    },

    /// Running stock for an item does not fit in a decimal.
    #[error("Stock total for {0} exceeds the supported quantity range")]
    QuantityOverflow(String),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::DirectionMismatch { .. } => "QUANTITY_SIGN_MISMATCH",
            Self::QuantityOverflow(_) => "QUANTITY_OVERFLOW",
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Database(_)) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ZeroQuantity | Self::DirectionMismatch { .. } => 400,
            Self::ItemNotFound(_) => 404,
            Self::QuantityOverflow(_) => 422,
            Self::Store(StoreError::Conflict(_)) => 409,
            Self::Store(StoreError::Database(_)) => 500,
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err.http_status_code() {
            400 => Self::Validation(err.to_string()),
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            422 => Self::Internal(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
