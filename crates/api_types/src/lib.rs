//! Shared request/response types for the Coinbook HTTP API.
//!
//! Amounts travel as integer minor units (cents); derived fields
//! (`money_in_minor`, `cash_balance_minor`, ...) appear only in responses —
//! the engine ignores caller-supplied balances by construction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod store {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreNew {
        pub name: String,
        pub address: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreView {
        pub id: Uuid,
        pub name: String,
        pub address: String,
        pub notes: Option<String>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoresResponse {
        pub stores: Vec<StoreView>,
    }
}

pub mod staff {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffNew {
        pub name: String,
        pub position: Option<String>,
    }

    /// Partial update; `None` fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StaffEdit {
        pub name: Option<String>,
        pub position: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanNew {
        pub amount_minor: i64,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanPayment {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanView {
        pub amount_minor: i64,
        pub repaid_minor: i64,
        pub date_issued: NaiveDate,
        pub due_date: NaiveDate,
        pub status: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffView {
        pub id: Uuid,
        pub store_id: Uuid,
        pub name: String,
        pub position: Option<String>,
        pub active: bool,
        pub loan: Option<LoanView>,
        pub created_at: DateTime<Utc>,
    }

    /// A store's full roster after an operation, ordered by name.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffResponse {
        pub staff: Vec<StaffView>,
    }
}

pub mod record {
    use super::*;

    /// Expense buckets, mirroring the engine's categories.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseCategory {
        Utilities,
        Maintenance,
        Supplies,
        Payroll,
        #[default]
        Other,
    }

    /// One revenue source's takings. The amount is signed; a negative value
    /// means the source paid out more than it took in that day.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RevenueLine {
        pub source_id: Uuid,
        pub source_name: String,
        pub amount_minor: i64,
    }

    /// One cash outlay. The amount must be non-negative.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseLine {
        pub description: String,
        pub amount_minor: i64,
        #[serde(default)]
        pub category: ExpenseCategory,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordCreate {
        pub store_id: Uuid,
        pub date: NaiveDate,
        #[serde(default)]
        pub revenue_lines: Vec<RevenueLine>,
        #[serde(default)]
        pub expense_lines: Vec<ExpenseLine>,
        pub actual_cash_count_minor: Option<i64>,
        pub notes: Option<String>,
    }

    /// Partial update; `None` fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordEdit {
        pub date: Option<NaiveDate>,
        pub revenue_lines: Option<Vec<RevenueLine>>,
        pub expense_lines: Option<Vec<ExpenseLine>>,
        pub actual_cash_count_minor: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordView {
        pub id: Uuid,
        pub store_id: Uuid,
        pub date: NaiveDate,
        pub revenue_lines: Vec<RevenueLine>,
        pub expense_lines: Vec<ExpenseLine>,
        pub money_in_minor: i64,
        pub money_out_minor: i64,
        pub daily_profit_minor: i64,
        pub cash_balance_minor: i64,
        pub actual_cash_count_minor: Option<i64>,
        pub notes: Option<String>,
        pub created_by: String,
        pub updated_by: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// A store's full ledger after an operation, most recent date first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        pub store_id: Uuid,
        pub records: Vec<RecordView>,
    }
}
