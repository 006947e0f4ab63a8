//! Customer and supplier directory.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use khata_core::counterparty::{Counterparty, CounterpartyKind};
use khata_core::store::{CounterpartyDirectory, StoreError};
use khata_shared::types::{CounterpartyId, OrganizationId};

use super::store_error;
use crate::entities::{customers, suppliers};

/// SeaORM-backed [`CounterpartyDirectory`] over the customers and suppliers tables.
#[derive(Debug, Clone)]
pub struct CounterpartyRepository {
    db: DatabaseConnection,
}

impl CounterpartyRepository {
    /// Creates a new counterparty repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn counterparty(kind: CounterpartyKind, id: uuid::Uuid, organization_id: uuid::Uuid, name: String) -> Counterparty {
    Counterparty {
        id: CounterpartyId::from_uuid(id),
        organization_id: OrganizationId::from_uuid(organization_id),
        kind,
        name,
    }
}

#[async_trait]
impl CounterpartyDirectory for CounterpartyRepository {
    async fn find_by_name(
        &self,
        kind: CounterpartyKind,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Counterparty>, StoreError> {
        let wanted = name.trim().to_lowercase();
        let org = organization_id.into_inner();

        let found = match kind {
            CounterpartyKind::Customer => customers::Entity::find()
                .filter(customers::Column::OrganizationId.eq(org))
                .filter(Expr::expr(Func::lower(Expr::col(customers::Column::Name))).eq(wanted))
                .one(&self.db)
                .await
                .map_err(store_error)?
                .map(|m| counterparty(kind, m.id, m.organization_id, m.name)),
            CounterpartyKind::Supplier => suppliers::Entity::find()
                .filter(suppliers::Column::OrganizationId.eq(org))
                .filter(Expr::expr(Func::lower(Expr::col(suppliers::Column::Name))).eq(wanted))
                .one(&self.db)
                .await
                .map_err(store_error)?
                .map(|m| counterparty(kind, m.id, m.organization_id, m.name)),
        };
        Ok(found)
    }

    async fn insert_counterparty(&self, counterparty: Counterparty) -> Result<Counterparty, StoreError> {
        let now = Utc::now().into();
        let id = counterparty.id.into_inner();
        let org = counterparty.organization_id.into_inner();

        match counterparty.kind {
            CounterpartyKind::Customer => {
                customers::ActiveModel {
                    id: Set(id),
                    organization_id: Set(org),
                    name: Set(counterparty.name.clone()),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map_err(store_error)?;
            }
            CounterpartyKind::Supplier => {
                suppliers::ActiveModel {
                    id: Set(id),
                    organization_id: Set(org),
                    name: Set(counterparty.name.clone()),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map_err(store_error)?;
            }
        }
        Ok(counterparty)
    }
}
