//! Chart of accounts error types.

use thiserror::Error;

use khata_shared::AppError;

use crate::store::StoreError;

/// Errors that can occur during chart of accounts operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    // ========== Validation Errors ==========
    /// Account code is blank.
    #[error("Account code is required")]
    MissingCode,

    /// Account name is blank or contains the path separator.
    #[error("Invalid account name: '{0}'")]
    InvalidName(String),

    /// Unrecognised account type string.
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    /// Unrecognised subtype string.
    #[error("Unknown account subtype: {0}")]
    UnknownSubtype(String),

    /// Subtype does not belong to the account type.
    #[error("Subtype {subtype} is not valid for account type {account_type}")]
    SubtypeMismatch {
        /// Requested subtype.
        subtype: String,
        /// Account type it was paired with.
        account_type: String,
    },

    /// Type changed while the old subtype was left in place.
    #[error("Changing account type requires choosing a new subtype")]
    SubtypeNotReset,

    /// Renames would orphan descendant paths.
    #[error("Account {0} has sub-accounts and cannot be renamed")]
    RenameWithChildren(String),

    /// Malformed account identifier.
    #[error("Invalid account id: {0}")]
    InvalidId(String),

    // ========== Conflict Errors ==========
    /// Another account already uses the code.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Another account already resolves to the same path.
    #[error("An account already exists at path {0}")]
    DuplicatePath(String),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(String),

    // ========== Store Errors ==========
    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCode => "MISSING_CODE",
            Self::InvalidName(_) => "INVALID_ACCOUNT_NAME",
            Self::InvalidAccountType(_) => "INVALID_ACCOUNT_TYPE",
            Self::UnknownSubtype(_) => "UNKNOWN_SUBTYPE",
            Self::SubtypeMismatch { .. } => "SUBTYPE_MISMATCH",
            Self::SubtypeNotReset => "SUBTYPE_NOT_RESET",
            Self::RenameWithChildren(_) => "RENAME_WITH_CHILDREN",
            Self::InvalidId(_) => "INVALID_ID",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::DuplicatePath(_) => "DUPLICATE_PATH",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Database(_)) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingCode
            | Self::InvalidName(_)
            | Self::InvalidAccountType(_)
            | Self::UnknownSubtype(_)
            | Self::SubtypeMismatch { .. }
            | Self::SubtypeNotReset
            | Self::RenameWithChildren(_)
            | Self::InvalidId(_) => 400,
            Self::AccountNotFound(_) | Self::ParentNotFound(_) => 404,
            Self::DuplicateCode(_) | Self::DuplicatePath(_) | Self::Store(StoreError::Conflict(_)) => 409,
            Self::Store(StoreError::Database(_)) => 500,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err.http_status_code() {
            400 => Self::Validation(err.to_string()),
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
