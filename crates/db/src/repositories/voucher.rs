//! Voucher number lookup.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use khata_core::store::{StoreError, VoucherSource};
use khata_core::voucher::{VoucherKind, VoucherNumbers};
use khata_shared::types::{OrganizationId, VoucherId};

use super::store_error;
use crate::entities::vouchers;

/// SeaORM-backed [`VoucherSource`] serving every voucher kind from one table.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a voucher's numbers.
    pub async fn insert_voucher(
        &self,
        kind: VoucherKind,
        organization_id: OrganizationId,
        id: VoucherId,
        numbers: VoucherNumbers,
    ) -> Result<(), StoreError> {
        vouchers::ActiveModel {
            id: Set(id.into_inner()),
            organization_id: Set(organization_id.into_inner()),
            voucher_type: Set(kind.as_str().to_string()),
            voucher_no: Set(numbers.voucher_no),
            reference_no: Set(numbers.reference_no),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;
        Ok(())
    }
}

#[async_trait]
impl VoucherSource for VoucherRepository {
    async fn find_voucher(
        &self,
        kind: VoucherKind,
        organization_id: OrganizationId,
        id: VoucherId,
    ) -> Result<Option<VoucherNumbers>, StoreError> {
        Ok(vouchers::Entity::find_by_id(id.into_inner())
            .filter(vouchers::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(vouchers::Column::VoucherType.eq(kind.as_str()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(|m| VoucherNumbers {
                voucher_no: m.voucher_no,
                reference_no: m.reference_no,
            }))
    }
}
