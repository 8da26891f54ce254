//! Chain recalculation: forward propagation of the running cash balance.
//!
//! Every mutation of a store's ledger calls into here. The propagation reads
//! the anchor (latest record strictly before the effective date), then walks
//! all records from the effective date onward in ascending date order,
//! assigning `cash_balance = running + daily_profit` and carrying the result
//! forward. The per-store date uniqueness constraint guarantees the walk has
//! exactly one order.
//!
//! Recalculation is idempotent: it always recomputes from the anchor forward
//! using the stored daily profits, so retrying wholesale after a failure is
//! safe.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    LedgerError, MoneyCents, ResultLedger, records::financial_records, util::parse_uuid,
};

use super::{Engine, with_tx};

/// One record touched by a propagation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecalculatedRecord {
    pub record_id: Uuid,
    pub date: NaiveDate,
    pub cash_balance: MoneyCents,
}

/// Outcome of a propagation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecalculationResult {
    /// Balance the propagation was seeded with (0 when no anchor exists).
    pub anchor_balance: MoneyCents,
    /// Records updated, in ascending date order.
    pub updated: Vec<RecalculatedRecord>,
}

impl Engine {
    /// Recomputes `cash_balance` for every record of `store_id` with
    /// `date >= effective_date`, inside the caller's transaction.
    ///
    /// On a failed row update the error reports how far propagation applied;
    /// the enclosing transaction rolls the partial chain back, so downstream
    /// records never stay inconsistent past the operation.
    pub(super) async fn recalculate_chain(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: Uuid,
        effective_date: NaiveDate,
    ) -> ResultLedger<RecalculationResult> {
        let anchor = financial_records::Entity::find()
            .filter(financial_records::Column::StoreId.eq(store_id.to_string()))
            .filter(financial_records::Column::Date.lt(effective_date))
            .order_by_desc(financial_records::Column::Date)
            .one(db_tx)
            .await?;
        let anchor_balance = anchor
            .map(|model| MoneyCents::new(model.cash_balance_minor))
            .unwrap_or(MoneyCents::ZERO);

        let chain = financial_records::Entity::find()
            .filter(financial_records::Column::StoreId.eq(store_id.to_string()))
            .filter(financial_records::Column::Date.gte(effective_date))
            .order_by_asc(financial_records::Column::Date)
            .all(db_tx)
            .await?;

        let mut running = anchor_balance;
        let mut updated = Vec::with_capacity(chain.len());
        let mut applied_through: Option<NaiveDate> = None;

        for model in chain {
            let record_id = parse_uuid(&model.id, "record")?;
            let cash_balance = running
                .checked_add(MoneyCents::new(model.daily_profit_minor))
                .ok_or_else(|| {
                    LedgerError::InvalidAmount(format!("cash balance overflow at {}", model.date))
                })?;

            let active = financial_records::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                cash_balance_minor: ActiveValue::Set(cash_balance.cents()),
                ..Default::default()
            };
            if let Err(err) = active.update(db_tx).await {
                return Err(LedgerError::Persistence {
                    applied_through,
                    failed_at: model.date,
                    source: err,
                });
            }

            applied_through = Some(model.date);
            updated.push(RecalculatedRecord {
                record_id,
                date: model.date,
                cash_balance,
            });
            running = cash_balance;
        }

        Ok(RecalculationResult {
            anchor_balance,
            updated,
        })
    }

    /// Wholesale recalculation for a store from `effective_date` onward.
    ///
    /// Takes the store lock and its own transaction; exposed for retry and
    /// repair flows, since propagation is idempotent.
    pub async fn recalculate_from(
        &self,
        store_id: Uuid,
        user_id: &str,
        effective_date: NaiveDate,
    ) -> ResultLedger<RecalculationResult> {
        let _guard = self.lock_store(store_id).await;
        with_tx!(self, |db_tx| {
            self.require_store(&db_tx, store_id, user_id).await?;
            self.recalculate_chain(&db_tx, store_id, effective_date).await
        })
    }
}
