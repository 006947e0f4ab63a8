//! Item and stock entry repository.

use std::ops::Bound;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use khata_core::inventory::{Item, StockEntry};
use khata_core::store::{ItemStore, StockStore, StoreError};
use khata_shared::types::{ItemId, OrganizationId, StockEntryId, WarehouseId};

use super::{date_bounds, store_error};
use crate::entities::{items, stock_entries};

/// SeaORM-backed [`ItemStore`] and [`StockStore`].
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn item_to_domain(model: items::Model) -> Item {
    Item {
        id: ItemId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        name: model.name,
        opening_stock: model.opening_stock,
        unit: model.unit,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn entry_to_domain(model: stock_entries::Model) -> StockEntry {
    StockEntry {
        id: StockEntryId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        item_id: ItemId::from_uuid(model.item_id),
        warehouse_id: model.warehouse_id.map(WarehouseId::from_uuid),
        date: model.date.with_timezone(&Utc),
        quantity: model.quantity,
        transaction_type: model.transaction_type,
        reference_id: model.reference_id,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl ItemStore for InventoryRepository {
    async fn find_item_by_id(
        &self,
        organization_id: OrganizationId,
        id: ItemId,
    ) -> Result<Option<Item>, StoreError> {
        Ok(items::Entity::find_by_id(id.into_inner())
            .filter(items::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(item_to_domain))
    }

    async fn find_item_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Item>, StoreError> {
        Ok(items::Entity::find()
            .filter(items::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(items::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(item_to_domain))
    }

    async fn insert_item(&self, item: Item) -> Result<Item, StoreError> {
        let model = items::ActiveModel {
            id: Set(item.id.into_inner()),
            organization_id: Set(item.organization_id.into_inner()),
            name: Set(item.name),
            opening_stock: Set(item.opening_stock),
            unit: Set(item.unit),
            created_at: Set(item.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;
        Ok(item_to_domain(model))
    }
}

#[async_trait]
impl StockStore for InventoryRepository {
    async fn insert_stock_entry(&self, entry: StockEntry) -> Result<StockEntry, StoreError> {
        let model = stock_entries::ActiveModel {
            id: Set(entry.id.into_inner()),
            organization_id: Set(entry.organization_id.into_inner()),
            item_id: Set(entry.item_id.into_inner()),
            warehouse_id: Set(entry.warehouse_id.map(WarehouseId::into_inner)),
            date: Set(entry.date.into()),
            quantity: Set(entry.quantity),
            transaction_type: Set(entry.transaction_type),
            reference_id: Set(entry.reference_id),
            notes: Set(entry.notes),
            created_at: Set(entry.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;
        Ok(entry_to_domain(model))
    }

    async fn find_stock_entries(
        &self,
        organization_id: OrganizationId,
        item_id: ItemId,
        since: Bound<DateTime<Utc>>,
        until: Bound<DateTime<Utc>>,
    ) -> Result<Vec<StockEntry>, StoreError> {
        Ok(stock_entries::Entity::find()
            .filter(stock_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(stock_entries::Column::ItemId.eq(item_id.into_inner()))
            .filter(date_bounds(stock_entries::Column::Date, &since, &until))
            .order_by_asc(stock_entries::Column::Date)
            .order_by_asc(stock_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(entry_to_domain)
            .collect())
    }
}
