//! Ledger blob entity - Stores named blobs in a key-value table.
//! The whole student ledger lives in one row, keyed by the configured
//! ledger key (`"messData"` by default).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger blob database model - one serialized value per key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_blobs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Slot name
    #[sea_orm(unique)]
    pub key: String,
    /// Serialized content of the slot
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the slot was last written
    pub updated_at: DateTime,
}

/// `LedgerBlob` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
