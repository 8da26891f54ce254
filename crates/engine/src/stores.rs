//! Store entity: the tenancy boundary of the ledger.
//!
//! Every financial record belongs to exactly one store, and a store belongs
//! to one owner (`user_id`, the username). All engine operations check store
//! ownership before touching the ledger.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, util::parse_uuid};

/// An arcade store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub notes: Option<String>,
    pub active: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(
        name: String,
        address: String,
        notes: Option<String>,
        user_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            notes,
            active: true,
            user_id,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub address: String,
    pub notes: Option<String>,
    pub active: bool,
    pub user_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::records::financial_records::Entity")]
    FinancialRecords,
}

impl Related<crate::records::financial_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Store> for ActiveModel {
    fn from(store: &Store) -> Self {
        Self {
            id: ActiveValue::Set(store.id.to_string()),
            name: ActiveValue::Set(store.name.clone()),
            address: ActiveValue::Set(store.address.clone()),
            notes: ActiveValue::Set(store.notes.clone()),
            active: ActiveValue::Set(store.active),
            user_id: ActiveValue::Set(store.user_id.clone()),
            created_at: ActiveValue::Set(store.created_at),
        }
    }
}

impl TryFrom<Model> for Store {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "store")?,
            name: model.name,
            address: model.address,
            notes: model.notes,
            active: model.active,
            user_id: model.user_id,
            created_at: model.created_at,
        })
    }
}
