//! `SeaORM` Entity for transaction_lines table.
//!
//! Mirrors the persisted line shape: `accounts`, `debit`, `credit`, `amount`,
//! `datetime`, `meta` and the owning journal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub journal_id: Uuid,
    pub organization_id: Uuid,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub accounts: String,
    pub debit: bool,
    pub credit: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub datetime: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub meta: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
