//! Revenue and expense line items.
//!
//! A [`RevenueLine`] is the day's takings from a single revenue source (an
//! arcade machine, a vending counter, ...). Its amount is signed: a machine
//! can run at a net loss for the day (payouts exceeding coin drop).
//!
//! An [`ExpenseLine`] is a single cash outlay; its amount is never negative.
//!
//! Amounts are stored as signed integer **minor units** (cents). Lines are
//! ordered by `position` within their record.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, util::parse_uuid};

/// Expense buckets used by store reports.
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

impl ExpenseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utilities => "utilities",
            Self::Maintenance => "maintenance",
            Self::Supplies => "supplies",
            Self::Payroll => "payroll",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "utilities" => Ok(Self::Utilities),
            "maintenance" => Ok(Self::Maintenance),
            "supplies" => Ok(Self::Supplies),
            "payroll" => Ok(Self::Payroll),
            "other" => Ok(Self::Other),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid expense category: {other}"
            ))),
        }
    }
}

/// One revenue source's takings for the day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueLine {
    pub source_id: Uuid,
    pub source_name: String,
    pub amount: MoneyCents,
}

/// One cash outlay for the day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub description: String,
    pub amount: MoneyCents,
    pub category: ExpenseCategory,
}

pub mod revenue_lines {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "revenue_lines")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub record_id: String,
        pub position: i32,
        pub source_id: String,
        pub source_name: String,
        pub amount_minor: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::records::financial_records::Entity",
            from = "Column::RecordId",
            to = "crate::records::financial_records::Column::Id",
            on_update = "NoAction",
            on_delete = "NoAction"
        )]
        FinancialRecords,
    }

    impl Related<crate::records::financial_records::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::FinancialRecords.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod expense_lines {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "expense_lines")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub record_id: String,
        pub position: i32,
        pub description: String,
        pub amount_minor: i64,
        pub category: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::records::financial_records::Entity",
            from = "Column::RecordId",
            to = "crate::records::financial_records::Column::Id",
            on_update = "NoAction",
            on_delete = "NoAction"
        )]
        FinancialRecords,
    }

    impl Related<crate::records::financial_records::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::FinancialRecords.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl RevenueLine {
    pub(crate) fn active_model(&self, record_id: Uuid, position: i32) -> revenue_lines::ActiveModel {
        revenue_lines::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            record_id: ActiveValue::Set(record_id.to_string()),
            position: ActiveValue::Set(position),
            source_id: ActiveValue::Set(self.source_id.to_string()),
            source_name: ActiveValue::Set(self.source_name.clone()),
            amount_minor: ActiveValue::Set(self.amount.cents()),
        }
    }
}

impl TryFrom<revenue_lines::Model> for RevenueLine {
    type Error = LedgerError;

    fn try_from(model: revenue_lines::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            source_id: parse_uuid(&model.source_id, "revenue source")?,
            source_name: model.source_name,
            amount: MoneyCents::new(model.amount_minor),
        })
    }
}

impl ExpenseLine {
    pub(crate) fn active_model(&self, record_id: Uuid, position: i32) -> expense_lines::ActiveModel {
        expense_lines::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            record_id: ActiveValue::Set(record_id.to_string()),
            position: ActiveValue::Set(position),
            description: ActiveValue::Set(self.description.clone()),
            amount_minor: ActiveValue::Set(self.amount.cents()),
            category: ActiveValue::Set(self.category.as_str().to_string()),
        }
    }
}

impl TryFrom<expense_lines::Model> for ExpenseLine {
    type Error = LedgerError;

    fn try_from(model: expense_lines::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            category: ExpenseCategory::try_from(model.category.as_str())?,
        })
    }
}
