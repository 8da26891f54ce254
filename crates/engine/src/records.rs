//! Daily financial record primitives.
//!
//! A [`FinancialRecord`] is one day's cash reconciliation for a store: the
//! revenue lines counted out of the machines, the expenses paid from the till,
//! the derived totals, and the running cash balance carried forward from the
//! previous day.
//!
//! `money_in`, `money_out` and `daily_profit` are derived from the lines (see
//! [`aggregate`](crate::aggregate)). `cash_balance` is derived from the chain:
//! the previous record's balance plus this day's profit, seeded at 0 for the
//! first record of a store. The engine owns both derivations; values supplied
//! by callers are ignored.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DailyTotals, ExpenseLine, LedgerError, MoneyCents, RevenueLine,
    lines::{expense_lines, revenue_lines},
    util::parse_uuid,
};

/// One day's reconciled financials for a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: Uuid,
    pub store_id: Uuid,
    pub date: NaiveDate,
    pub revenue_lines: Vec<RevenueLine>,
    pub expense_lines: Vec<ExpenseLine>,
    pub money_in: MoneyCents,
    pub money_out: MoneyCents,
    pub daily_profit: MoneyCents,
    pub cash_balance: MoneyCents,
    /// Cash physically counted at close, entered by staff. Audit-only: it
    /// never participates in recalculation.
    pub actual_cash_count: Option<MoneyCents>,
    pub notes: Option<String>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialRecord {
    /// Builds a new record with engine-derived totals and a provisional cash
    /// balance of 0 (the chain recalculation assigns the real one).
    pub fn new(
        store_id: Uuid,
        date: NaiveDate,
        revenue_lines: Vec<RevenueLine>,
        expense_lines: Vec<ExpenseLine>,
        totals: DailyTotals,
        actual_cash_count: Option<MoneyCents>,
        notes: Option<String>,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            date,
            revenue_lines,
            expense_lines,
            money_in: totals.money_in,
            money_out: totals.money_out,
            daily_profit: totals.daily_profit,
            cash_balance: MoneyCents::ZERO,
            actual_cash_count,
            notes,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A store's full ledger: all records, most recent date first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub store_id: Uuid,
    pub records: Vec<FinancialRecord>,
}

pub mod financial_records {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "financial_records")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub store_id: String,
        pub date: Date,
        pub money_in_minor: i64,
        pub money_out_minor: i64,
        pub daily_profit_minor: i64,
        pub cash_balance_minor: i64,
        pub actual_cash_count_minor: Option<i64>,
        pub notes: Option<String>,
        pub created_by: String,
        pub updated_by: Option<String>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "crate::lines::revenue_lines::Entity")]
        RevenueLines,
        #[sea_orm(has_many = "crate::lines::expense_lines::Entity")]
        ExpenseLines,
        #[sea_orm(
            belongs_to = "crate::stores::Entity",
            from = "Column::StoreId",
            to = "crate::stores::Column::Id",
            on_update = "NoAction",
            on_delete = "NoAction"
        )]
        Stores,
    }

    impl Related<crate::lines::revenue_lines::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::RevenueLines.def()
        }
    }

    impl Related<crate::lines::expense_lines::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ExpenseLines.def()
        }
    }

    impl Related<crate::stores::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Stores.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&FinancialRecord> for financial_records::ActiveModel {
    fn from(record: &FinancialRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            store_id: ActiveValue::Set(record.store_id.to_string()),
            date: ActiveValue::Set(record.date),
            money_in_minor: ActiveValue::Set(record.money_in.cents()),
            money_out_minor: ActiveValue::Set(record.money_out.cents()),
            daily_profit_minor: ActiveValue::Set(record.daily_profit.cents()),
            cash_balance_minor: ActiveValue::Set(record.cash_balance.cents()),
            actual_cash_count_minor: ActiveValue::Set(
                record.actual_cash_count.map(MoneyCents::cents),
            ),
            notes: ActiveValue::Set(record.notes.clone()),
            created_by: ActiveValue::Set(record.created_by.clone()),
            updated_by: ActiveValue::Set(record.updated_by.clone()),
            created_at: ActiveValue::Set(record.created_at),
            updated_at: ActiveValue::Set(record.updated_at),
        }
    }
}

impl
    TryFrom<(
        financial_records::Model,
        Vec<revenue_lines::Model>,
        Vec<expense_lines::Model>,
    )> for FinancialRecord
{
    type Error = LedgerError;

    fn try_from(
        (model, revenue_models, expense_models): (
            financial_records::Model,
            Vec<revenue_lines::Model>,
            Vec<expense_lines::Model>,
        ),
    ) -> Result<Self, Self::Error> {
        let revenue_lines = revenue_models
            .into_iter()
            .map(RevenueLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let expense_lines = expense_models
            .into_iter()
            .map(ExpenseLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: parse_uuid(&model.id, "record")?,
            store_id: parse_uuid(&model.store_id, "store")?,
            date: model.date,
            revenue_lines,
            expense_lines,
            money_in: MoneyCents::new(model.money_in_minor),
            money_out: MoneyCents::new(model.money_out_minor),
            daily_profit: MoneyCents::new(model.daily_profit_minor),
            cash_balance: MoneyCents::new(model.cash_balance_minor),
            actual_cash_count: model.actual_cash_count_minor.map(MoneyCents::new),
            notes: model.notes,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
