//! Chart of accounts service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use khata_shared::types::{AccountId, OrganizationId};

use super::error::CatalogError;
use super::path;
use super::types::{Account, CreateAccountInput, UpdateAccountInput};
use super::validation::{apply_update, check_path_collision, validate_create};
use crate::store::AccountStore;

/// Creates, edits and looks up accounts.
#[derive(Clone)]
pub struct CatalogService {
    accounts: Arc<dyn AccountStore>,
}

impl CatalogService {
    /// Creates a new catalog service.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Creates an account at the top level or under a parent.
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id, code = %input.code))]
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, CatalogError> {
        validate_create(&input)?;
        let organization_id = input.organization_id;
        let code = input.code.trim().to_string();

        if self
            .accounts
            .find_account_by_code(organization_id, &code)
            .await?
            .is_some()
        {
            return Err(CatalogError::DuplicateCode(code));
        }

        let parent = match input.parent_code.as_deref().map(str::trim) {
            Some(parent_code) if !parent_code.is_empty() => Some(
                self.accounts
                    .find_account_by_code(organization_id, parent_code)
                    .await?
                    .ok_or_else(|| CatalogError::ParentNotFound(parent_code.to_string()))?,
            ),
            _ => None,
        };

        let account_path = path::join(parent.as_ref().map(|p| p.path.as_str()), &input.name);
        let siblings = self
            .accounts
            .list_children(organization_id, parent.as_ref().map(|p| p.code.as_str()))
            .await?;
        check_path_collision(&account_path, &siblings, None)?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            organization_id,
            code,
            name: input.name.trim().to_string(),
            path: account_path,
            account_type: input.account_type,
            subtype: input.subtype,
            parent_code: parent.map(|p| p.code),
            description: input.description,
            opening_balance: input.opening_balance,
            created_at: now,
            updated_at: now,
        };

        let created = self.accounts.insert_account(account).await?;
        info!(account_id = %created.id, path = %created.path, "Account created");
        Ok(created)
    }

    /// Applies a partial update to an account.
    #[instrument(skip(self, update), fields(organization_id = %organization_id, account_id = %id))]
    pub async fn update_account(
        &self,
        organization_id: OrganizationId,
        id: AccountId,
        update: UpdateAccountInput,
    ) -> Result<Account, CatalogError> {
        let account = self.get_by_id(organization_id, id).await?;
        if update.is_empty() {
            return Ok(account);
        }

        let children = self
            .accounts
            .list_children(organization_id, Some(&account.code))
            .await?;
        let updated = apply_update(&account, &update, !children.is_empty(), Utc::now())?;

        if updated.path != account.path {
            let siblings = self
                .accounts
                .list_children(organization_id, account.parent_code.as_deref())
                .await?;
            check_path_collision(&updated.path, &siblings, Some(account.id))?;
        }

        let saved = self.accounts.update_account(updated).await?;
        info!(path = %saved.path, "Account updated");
        Ok(saved)
    }

    /// Looks up an account by id.
    pub async fn get_by_id(
        &self,
        organization_id: OrganizationId,
        id: AccountId,
    ) -> Result<Account, CatalogError> {
        self.accounts
            .find_account_by_id(organization_id, id)
            .await?
            .ok_or_else(|| CatalogError::AccountNotFound(id.to_string()))
    }

    /// Looks up an account by code.
    pub async fn get_by_code(
        &self,
        organization_id: OrganizationId,
        code: &str,
    ) -> Result<Account, CatalogError> {
        self.accounts
            .find_account_by_code(organization_id, code.trim())
            .await?
            .ok_or_else(|| CatalogError::AccountNotFound(code.to_string()))
    }

    /// Looks up an account by exact path.
    pub async fn get_by_path(
        &self,
        organization_id: OrganizationId,
        account_path: &str,
    ) -> Result<Account, CatalogError> {
        self.accounts
            .find_account_by_path(organization_id, account_path.trim())
            .await?
            .ok_or_else(|| CatalogError::AccountNotFound(account_path.to_string()))
    }

    /// Lists every account of the organization.
    pub async fn list_accounts(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Account>, CatalogError> {
        Ok(self.accounts.list_accounts(organization_id).await?)
    }

    /// Lists the direct children of an account, or the roots when `parent_code` is `None`.
    pub async fn list_children(
        &self,
        organization_id: OrganizationId,
        parent_code: Option<&str>,
    ) -> Result<Vec<Account>, CatalogError> {
        if let Some(code) = parent_code {
            self.get_by_code(organization_id, code).await?;
        }
        Ok(self
            .accounts
            .list_children(organization_id, parent_code.map(str::trim))
            .await?)
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
