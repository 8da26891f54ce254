//! Record operations: create, edit, delete, fetch.
//!
//! Every mutation runs as {validate → write → recalculate chain → snapshot}
//! under the store lock and inside one DB transaction. Each operation returns
//! the store's full ledger so clients can refresh their view immediately.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    FinancialRecord, LedgerError, LedgerSnapshot, RecordCreateCmd, RecordEditCmd, ResultLedger,
    aggregate,
    lines::{ExpenseLine, RevenueLine, expense_lines, revenue_lines},
    records::financial_records,
    util::{normalize_optional_text, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a record for `store_id+date` and reflows the chain from that
    /// date. Rejects `DuplicateDate` before writing anything.
    pub async fn create_record(&self, cmd: RecordCreateCmd) -> ResultLedger<LedgerSnapshot> {
        // Aggregate first: InvalidAmount must surface before any write.
        let totals = aggregate(&cmd.revenue_lines, &cmd.expense_lines)?;

        let _guard = self.lock_store(cmd.store_id).await;
        with_tx!(self, |db_tx| {
            self.require_store(&db_tx, cmd.store_id, &cmd.user_id).await?;
            if self
                .record_exists_on(&db_tx, cmd.store_id, cmd.date, None)
                .await?
            {
                return Err(LedgerError::DuplicateDate(cmd.date));
            }

            let record = FinancialRecord::new(
                cmd.store_id,
                cmd.date,
                cmd.revenue_lines,
                cmd.expense_lines,
                totals,
                cmd.actual_cash_count,
                normalize_optional_text(cmd.notes.as_deref()),
                cmd.user_id,
                Utc::now(),
            );

            financial_records::ActiveModel::from(&record)
                .insert(&db_tx)
                .await?;
            self.insert_lines(&db_tx, record.id, &record.revenue_lines, &record.expense_lines)
                .await?;

            self.recalculate_chain(&db_tx, cmd.store_id, cmd.date).await?;
            self.load_ledger(&db_tx, cmd.store_id).await
        })
    }

    /// Edits a record. A date change behaves as removal plus reinsertion, so
    /// the chain reflows from the earlier of the two dates.
    pub async fn edit_record(&self, cmd: RecordEditCmd) -> ResultLedger<LedgerSnapshot> {
        let store_id = self.store_of_record(cmd.record_id).await?;

        let _guard = self.lock_store(store_id).await;
        with_tx!(self, |db_tx| {
            let model = self.require_record(&db_tx, cmd.record_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, &cmd.user_id).await?;

            let old_date = model.date;
            let new_date = cmd.date.unwrap_or(old_date);
            if new_date != old_date
                && self
                    .record_exists_on(&db_tx, store_id, new_date, Some(&model.id))
                    .await?
            {
                return Err(LedgerError::DuplicateDate(new_date));
            }

            let lines_changed = cmd.revenue_lines.is_some() || cmd.expense_lines.is_some();
            let mut active = financial_records::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                date: ActiveValue::Set(new_date),
                updated_by: ActiveValue::Set(Some(cmd.user_id.clone())),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(counted) = cmd.actual_cash_count {
                active.actual_cash_count_minor = ActiveValue::Set(Some(counted.cents()));
            }
            if let Some(notes) = cmd.notes.as_deref() {
                active.notes = ActiveValue::Set(normalize_optional_text(Some(notes)));
            }

            if lines_changed {
                // Fill in the unchanged side so aggregation sees the full day.
                let revenue_lines = match cmd.revenue_lines {
                    Some(lines) => lines,
                    None => self.load_revenue_lines(&db_tx, &model.id).await?,
                };
                let expense_lines = match cmd.expense_lines {
                    Some(lines) => lines,
                    None => self.load_expense_lines(&db_tx, &model.id).await?,
                };
                let totals = aggregate(&revenue_lines, &expense_lines)?;

                active.money_in_minor = ActiveValue::Set(totals.money_in.cents());
                active.money_out_minor = ActiveValue::Set(totals.money_out.cents());
                active.daily_profit_minor = ActiveValue::Set(totals.daily_profit.cents());
                active.update(&db_tx).await?;

                self.delete_lines(&db_tx, &model.id).await?;
                self.insert_lines(&db_tx, cmd.record_id, &revenue_lines, &expense_lines)
                    .await?;
            } else {
                active.update(&db_tx).await?;
            }

            self.recalculate_chain(&db_tx, store_id, old_date.min(new_date))
                .await?;
            self.load_ledger(&db_tx, store_id).await
        })
    }

    /// Deletes a record and reflows the chain from its date, so the next
    /// remaining record picks up the correct preceding balance.
    pub async fn delete_record(
        &self,
        record_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<LedgerSnapshot> {
        let store_id = self.store_of_record(record_id).await?;

        let _guard = self.lock_store(store_id).await;
        with_tx!(self, |db_tx| {
            let model = self.require_record(&db_tx, record_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, user_id).await?;
            let date = model.date;

            self.delete_lines(&db_tx, &model.id).await?;
            financial_records::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;

            self.recalculate_chain(&db_tx, store_id, date).await?;
            self.load_ledger(&db_tx, store_id).await
        })
    }

    /// Read-only ledger snapshot: all records, most recent date first.
    pub async fn fetch_ledger(
        &self,
        store_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<LedgerSnapshot> {
        with_tx!(self, |db_tx| {
            self.require_store(&db_tx, store_id, user_id).await?;
            self.load_ledger(&db_tx, store_id).await
        })
    }

    async fn store_of_record(&self, record_id: Uuid) -> ResultLedger<Uuid> {
        let model = financial_records::Entity::find_by_id(record_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::RecordNotFound(record_id.to_string()))?;
        parse_uuid(&model.store_id, "store")
    }

    async fn record_exists_on(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: Uuid,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> ResultLedger<bool> {
        let mut query = financial_records::Entity::find()
            .filter(financial_records::Column::StoreId.eq(store_id.to_string()))
            .filter(financial_records::Column::Date.eq(date));
        if let Some(id) = exclude_id {
            query = query.filter(financial_records::Column::Id.ne(id));
        }
        Ok(query.one(db_tx).await?.is_some())
    }

    async fn insert_lines(
        &self,
        db_tx: &DatabaseTransaction,
        record_id: Uuid,
        revenue_lines: &[RevenueLine],
        expense_lines: &[ExpenseLine],
    ) -> ResultLedger<()> {
        for (position, line) in revenue_lines.iter().enumerate() {
            line.active_model(record_id, position as i32)
                .insert(db_tx)
                .await?;
        }
        for (position, line) in expense_lines.iter().enumerate() {
            line.active_model(record_id, position as i32)
                .insert(db_tx)
                .await?;
        }
        Ok(())
    }

    async fn delete_lines(&self, db_tx: &DatabaseTransaction, record_id: &str) -> ResultLedger<()> {
        revenue_lines::Entity::delete_many()
            .filter(revenue_lines::Column::RecordId.eq(record_id))
            .exec(db_tx)
            .await?;
        expense_lines::Entity::delete_many()
            .filter(expense_lines::Column::RecordId.eq(record_id))
            .exec(db_tx)
            .await?;
        Ok(())
    }

    async fn load_revenue_lines(
        &self,
        db_tx: &DatabaseTransaction,
        record_id: &str,
    ) -> ResultLedger<Vec<RevenueLine>> {
        let models = revenue_lines::Entity::find()
            .filter(revenue_lines::Column::RecordId.eq(record_id))
            .order_by_asc(revenue_lines::Column::Position)
            .all(db_tx)
            .await?;
        models.into_iter().map(RevenueLine::try_from).collect()
    }

    async fn load_expense_lines(
        &self,
        db_tx: &DatabaseTransaction,
        record_id: &str,
    ) -> ResultLedger<Vec<ExpenseLine>> {
        let models = expense_lines::Entity::find()
            .filter(expense_lines::Column::RecordId.eq(record_id))
            .order_by_asc(expense_lines::Column::Position)
            .all(db_tx)
            .await?;
        models.into_iter().map(ExpenseLine::try_from).collect()
    }

    pub(super) async fn load_ledger(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: Uuid,
    ) -> ResultLedger<LedgerSnapshot> {
        let record_models = financial_records::Entity::find()
            .filter(financial_records::Column::StoreId.eq(store_id.to_string()))
            .order_by_desc(financial_records::Column::Date)
            .all(db_tx)
            .await?;

        let mut records = Vec::with_capacity(record_models.len());
        for model in record_models {
            let revenue_models = revenue_lines::Entity::find()
                .filter(revenue_lines::Column::RecordId.eq(model.id.as_str()))
                .order_by_asc(revenue_lines::Column::Position)
                .all(db_tx)
                .await?;
            let expense_models = expense_lines::Entity::find()
                .filter(expense_lines::Column::RecordId.eq(model.id.as_str()))
                .order_by_asc(expense_lines::Column::Position)
                .all(db_tx)
                .await?;
            records.push(FinancialRecord::try_from((
                model,
                revenue_models,
                expense_models,
            ))?);
        }

        Ok(LedgerSnapshot { store_id, records })
    }
}
