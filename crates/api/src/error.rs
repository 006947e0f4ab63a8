//! JSON error envelope for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use khata_core::catalog::CatalogError;
use khata_core::inventory::InventoryError;
use khata_core::ledger::LedgerError;
use khata_shared::AppError;

/// An error rendered as `{ "success": false, "error": ..., "code": ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Builds an error from a numeric status.
    #[must_use]
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }

    /// A 400 validation error.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(400, code, message)
    }

    /// Whether this is an environment fault rather than a caller mistake.
    #[must_use]
    pub fn is_server_fault(&self) -> bool {
        self.status.is_server_error()
    }

    /// The message shown to clients; server faults are not echoed.
    #[must_use]
    pub fn public_message(&self) -> &str {
        if self.is_server_fault() {
            "An unexpected error occurred"
        } else {
            &self.message
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            error!(code = self.code, error = %self.message, "Request failed");
        }
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.public_message(),
                "code": self.code,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::store::StoreError;

    #[test]
    fn test_domain_errors_keep_status_and_code() {
        let err = ApiError::from(LedgerError::MissingMemo);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Memo is required");

        let err = ApiError::from(CatalogError::AccountNotFound("42".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "ACCOUNT_NOT_FOUND");
    }

    #[test]
    fn test_store_failures_are_not_echoed() {
        let err = ApiError::from(LedgerError::Store(StoreError::Database("password=hunter2".into())));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("hunter2"));
    }
}
