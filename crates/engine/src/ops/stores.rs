use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ResultLedger, Store, stores,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new store owned by `user_id`.
    pub async fn new_store(
        &self,
        name: &str,
        address: &str,
        notes: Option<&str>,
        user_id: &str,
    ) -> ResultLedger<Store> {
        let name = normalize_required_text(name, "store name")?;
        let address = normalize_required_text(address, "store address")?;

        let store = Store::new(
            name,
            address,
            normalize_optional_text(notes),
            user_id.to_string(),
            Utc::now(),
        );
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            stores::ActiveModel::from(&store).insert(&db_tx).await?;
            Ok(store)
        })
    }

    /// List the stores owned by `user_id`.
    pub async fn stores(&self, user_id: &str) -> ResultLedger<Vec<Store>> {
        let models = stores::Entity::find()
            .filter(stores::Column::UserId.eq(user_id))
            .order_by_asc(stores::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Store::try_from).collect()
    }

    /// Delete a store, its entire ledger and its staff roster.
    pub async fn delete_store(&self, store_id: Uuid, user_id: &str) -> ResultLedger<()> {
        let guard = self.lock_store(store_id).await;
        let result: ResultLedger<()> = with_tx!(self, |db_tx| {
            let store_model = self.require_store(&db_tx, store_id, user_id).await?;
            let store_db_id = store_model.id;

            // Explicit cascade delete within one DB transaction (the line
            // tables reference records without ON DELETE CASCADE).
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM revenue_lines WHERE record_id IN (SELECT id FROM financial_records WHERE store_id = ?);",
                    vec![store_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM expense_lines WHERE record_id IN (SELECT id FROM financial_records WHERE store_id = ?);",
                    vec![store_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM financial_records WHERE store_id = ?;",
                    vec![store_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM staff_members WHERE store_id = ?;",
                    vec![store_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM stores WHERE id = ?;",
                    vec![store_db_id.into()],
                ))
                .await?;

            Ok(())
        });

        // The store is gone; stop tracking its lock. Current holders keep
        // their Arc clone alive until they drop the guard.
        drop(guard);
        if result.is_ok() {
            self.release_store_lock(store_id);
        }
        result
    }
}
