//! Chart of accounts business rules.
//!
//! Pure functions; the service feeds them data loaded from the store.

use chrono::{DateTime, Utc};

use khata_shared::types::AccountId;

use super::error::CatalogError;
use super::path;
use super::types::{Account, AccountSubtype, AccountType, CreateAccountInput, UpdateAccountInput};

/// Checks that a subtype, if any, belongs to the account type.
pub fn validate_subtype(
    account_type: AccountType,
    subtype: Option<AccountSubtype>,
) -> Result<(), CatalogError> {
    match subtype {
        Some(subtype) if !subtype.belongs_to(account_type) => Err(CatalogError::SubtypeMismatch {
            subtype: subtype.to_string(),
            account_type: account_type.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Checks that a name can be used as a single path segment.
pub fn validate_name(name: &str) -> Result<(), CatalogError> {
    if path::is_valid_segment(name) {
        Ok(())
    } else {
        Err(CatalogError::InvalidName(name.to_string()))
    }
}

/// Validates the input fields of a new account that need no store access.
pub fn validate_create(input: &CreateAccountInput) -> Result<(), CatalogError> {
    if input.code.trim().is_empty() {
        return Err(CatalogError::MissingCode);
    }
    validate_name(&input.name)?;
    validate_subtype(input.account_type, input.subtype)
}

/// Rejects `candidate_path` if a sibling already resolves to it, ignoring case.
///
/// `editing` excludes the account being edited from the comparison.
pub fn check_path_collision(
    candidate_path: &str,
    siblings: &[Account],
    editing: Option<AccountId>,
) -> Result<(), CatalogError> {
    let clash = siblings
        .iter()
        .filter(|sibling| Some(sibling.id) != editing)
        .any(|sibling| path::eq_ignore_case(&sibling.path, candidate_path));

    if clash {
        Err(CatalogError::DuplicatePath(candidate_path.to_string()))
    } else {
        Ok(())
    }
}

/// Applies an update to a copy of `account`.
///
/// Renames recompute the path under the same parent and are refused while the
/// account has children. Changing the type while the account carries a subtype
/// requires the update to choose a subtype too.
pub fn apply_update(
    account: &Account,
    update: &UpdateAccountInput,
    has_children: bool,
    now: DateTime<Utc>,
) -> Result<Account, CatalogError> {
    let mut updated = account.clone();

    if let Some(name) = &update.name {
        let name = name.trim();
        if name != account.name {
            validate_name(name)?;
            if has_children {
                return Err(CatalogError::RenameWithChildren(account.code.clone()));
            }
            updated.path = path::join(path::parent(&account.path), name);
            updated.name = name.to_string();
        }
    }

    if let Some(account_type) = update.account_type {
        if account_type != account.account_type
            && update.subtype.is_none()
            && account.subtype.is_some()
        {
            return Err(CatalogError::SubtypeNotReset);
        }
        updated.account_type = account_type;
    }

    if let Some(subtype) = update.subtype {
        updated.subtype = subtype;
    }
    validate_subtype(updated.account_type, updated.subtype)?;

    if let Some(description) = &update.description {
        updated.description.clone_from(description);
    }
    if let Some(opening_balance) = update.opening_balance {
        updated.opening_balance = opening_balance;
    }

    updated.updated_at = now;
    Ok(updated)
}
