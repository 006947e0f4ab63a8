//! Account repository for chart of accounts database operations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use khata_core::catalog::{Account, AccountSubtype, AccountType};
use khata_core::store::{AccountStore, StoreError};
use khata_shared::types::{AccountId, OrganizationId};

use super::{corrupt, store_error};
use crate::entities::chart_of_accounts;

/// SeaORM-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: chart_of_accounts::Model) -> Result<Account, StoreError> {
    let account_type = model
        .account_type
        .parse::<AccountType>()
        .map_err(|_| corrupt("account_type", &model.account_type))?;
    let subtype = model
        .subtype
        .as_deref()
        .map(|s| s.parse::<AccountSubtype>().map_err(|_| corrupt("subtype", s)))
        .transpose()?;

    Ok(Account {
        id: AccountId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        code: model.code,
        name: model.name,
        path: model.path,
        account_type,
        subtype,
        parent_code: model.parent_code,
        description: model.description,
        opening_balance: model.opening_balance,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn to_active(account: &Account) -> chart_of_accounts::ActiveModel {
    chart_of_accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        organization_id: Set(account.organization_id.into_inner()),
        code: Set(account.code.clone()),
        name: Set(account.name.clone()),
        path: Set(account.path.clone()),
        account_type: Set(account.account_type.as_str().to_string()),
        subtype: Set(account.subtype.map(|s| s.as_str().to_string())),
        parent_code: Set(account.parent_code.clone()),
        description: Set(account.description.clone()),
        opening_balance: Set(account.opening_balance),
        created_at: Set(account.created_at.into()),
        updated_at: Set(account.updated_at.into()),
    }
}

fn to_domain_all(models: Vec<chart_of_accounts::Model>) -> Result<Vec<Account>, StoreError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let model = to_active(&account).insert(&self.db).await.map_err(store_error)?;
        to_domain(model)
    }

    async fn update_account(&self, account: Account) -> Result<Account, StoreError> {
        let existing = chart_of_accounts::Entity::find_by_id(account.id.into_inner())
            .filter(chart_of_accounts::Column::OrganizationId.eq(account.organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::Database(format!("account {} does not exist", account.id)))?;

        let mut active = existing.into_active_model();
        active.name = Set(account.name.clone());
        active.path = Set(account.path.clone());
        active.account_type = Set(account.account_type.as_str().to_string());
        active.subtype = Set(account.subtype.map(|s| s.as_str().to_string()));
        active.description = Set(account.description.clone());
        active.opening_balance = Set(account.opening_balance);
        active.updated_at = Set(account.updated_at.into());

        let model = active.update(&self.db).await.map_err(store_error)?;
        to_domain(model)
    }

    async fn find_account_by_id(
        &self,
        organization_id: OrganizationId,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        chart_of_accounts::Entity::find_by_id(id.into_inner())
            .filter(chart_of_accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_account_by_code(
        &self,
        organization_id: OrganizationId,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(chart_of_accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_account_by_path(
        &self,
        organization_id: OrganizationId,
        path: &str,
    ) -> Result<Option<Account>, StoreError> {
        chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(chart_of_accounts::Column::Path.eq(path))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn list_accounts(&self, organization_id: OrganizationId) -> Result<Vec<Account>, StoreError> {
        let models = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        to_domain_all(models)
    }

    async fn list_children(
        &self,
        organization_id: OrganizationId,
        parent_code: Option<&str>,
    ) -> Result<Vec<Account>, StoreError> {
        let mut query = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::OrganizationId.eq(organization_id.into_inner()));
        query = match parent_code {
            Some(code) => query.filter(chart_of_accounts::Column::ParentCode.eq(code)),
            None => query.filter(chart_of_accounts::Column::ParentCode.is_null()),
        };
        let models = query
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        to_domain_all(models)
    }
}
