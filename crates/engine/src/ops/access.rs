use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerError, ResultLedger, records::financial_records, staff::staff_members, stores, users,
};

use super::Engine;

impl Engine {
    /// Resolves a store and checks ownership.
    ///
    /// A store owned by someone else is reported the same way as a missing
    /// one, so the API does not leak which store ids exist.
    pub(super) async fn require_store(
        &self,
        db: &DatabaseTransaction,
        store_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<stores::Model> {
        let model = stores::Entity::find_by_id(store_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::StoreNotFound(store_id.to_string()))?;
        if model.user_id != user_id {
            return Err(LedgerError::StoreNotFound(store_id.to_string()));
        }
        Ok(model)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultLedger<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(LedgerError::InvalidId(format!("unknown user {username}")));
        }
        Ok(())
    }

    /// Resolves a staff member by id.
    pub(super) async fn require_staff(
        &self,
        db: &DatabaseTransaction,
        staff_id: Uuid,
    ) -> ResultLedger<staff_members::Model> {
        staff_members::Entity::find_by_id(staff_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::StaffNotFound(staff_id.to_string()))
    }

    /// Resolves a record by id.
    pub(super) async fn require_record(
        &self,
        db: &DatabaseTransaction,
        record_id: Uuid,
    ) -> ResultLedger<financial_records::Model> {
        financial_records::Entity::find_by_id(record_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::RecordNotFound(record_id.to_string()))
    }
}
