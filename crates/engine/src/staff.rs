//! Store staff and their loan ledger.
//!
//! A [`StaffMember`] belongs to exactly one store; staff visibility follows
//! store ownership. A member can carry at most one loan at a time: payments
//! accumulate against it and the loan flips to `Paid` once the repaid total
//! covers the amount, after which a new loan may be issued.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Paid,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for LoanStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "paid" => Ok(Self::Paid),
            other => Err(LedgerError::InvalidId(format!(
                "invalid loan status: {other}"
            ))),
        }
    }
}

/// One outstanding (or settled) cash advance to a staff member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffLoan {
    pub amount: MoneyCents,
    pub repaid: MoneyCents,
    pub date_issued: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
    pub notes: Option<String>,
}

impl StaffLoan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Amount still owed.
    #[must_use]
    pub fn outstanding(&self) -> MoneyCents {
        self.amount - self.repaid
    }
}

/// One store employee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: String,
    pub position: Option<String>,
    pub active: bool,
    pub loan: Option<StaffLoan>,
    pub created_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn new(
        store_id: Uuid,
        name: String,
        position: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            name,
            position,
            active: true,
            loan: None,
            created_at: now,
        }
    }
}

pub mod staff_members {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "staff_members")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub store_id: String,
        pub name: String,
        pub position: Option<String>,
        pub active: bool,
        pub loan_amount_minor: Option<i64>,
        pub loan_repaid_minor: Option<i64>,
        pub loan_issued: Option<Date>,
        pub loan_due: Option<Date>,
        pub loan_status: Option<String>,
        pub loan_notes: Option<String>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::stores::Entity",
            from = "Column::StoreId",
            to = "crate::stores::Column::Id",
            on_update = "NoAction",
            on_delete = "NoAction"
        )]
        Stores,
    }

    impl Related<crate::stores::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Stores.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&StaffMember> for staff_members::ActiveModel {
    fn from(member: &StaffMember) -> Self {
        let loan = member.loan.as_ref();
        Self {
            id: ActiveValue::Set(member.id.to_string()),
            store_id: ActiveValue::Set(member.store_id.to_string()),
            name: ActiveValue::Set(member.name.clone()),
            position: ActiveValue::Set(member.position.clone()),
            active: ActiveValue::Set(member.active),
            loan_amount_minor: ActiveValue::Set(loan.map(|l| l.amount.cents())),
            loan_repaid_minor: ActiveValue::Set(loan.map(|l| l.repaid.cents())),
            loan_issued: ActiveValue::Set(loan.map(|l| l.date_issued)),
            loan_due: ActiveValue::Set(loan.map(|l| l.due_date)),
            loan_status: ActiveValue::Set(loan.map(|l| l.status.as_str().to_string())),
            loan_notes: ActiveValue::Set(loan.and_then(|l| l.notes.clone())),
            created_at: ActiveValue::Set(member.created_at),
        }
    }
}

impl TryFrom<staff_members::Model> for StaffMember {
    type Error = LedgerError;

    fn try_from(model: staff_members::Model) -> Result<Self, Self::Error> {
        let loan = match (model.loan_amount_minor, model.loan_issued, model.loan_due) {
            (Some(amount), Some(date_issued), Some(due_date)) => Some(StaffLoan {
                amount: MoneyCents::new(amount),
                repaid: MoneyCents::new(model.loan_repaid_minor.unwrap_or(0)),
                date_issued,
                due_date,
                status: LoanStatus::try_from(model.loan_status.as_deref().unwrap_or("active"))?,
                notes: model.loan_notes,
            }),
            _ => None,
        };

        Ok(Self {
            id: parse_uuid(&model.id, "staff")?,
            store_id: parse_uuid(&model.store_id, "store")?,
            name: model.name,
            position: model.position,
            active: model.active,
            loan,
            created_at: model.created_at,
        })
    }
}
