//! Staff operations: roster CRUD and the per-member loan ledger.
//!
//! Staff visibility follows store ownership, so every operation resolves the
//! store and checks the caller owns it. Mutations return the store's full
//! roster, the same way record mutations return the full ledger.

use chrono::{Days, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    LedgerError, MoneyCents, ResultLedger, StaffEditCmd,
    staff::{LoanStatus, StaffLoan, StaffMember, staff_members},
    util::{normalize_optional_text, normalize_required_text, parse_uuid},
};

use super::{Engine, with_tx};

const LOAN_TERM_DAYS: u64 = 30;

impl Engine {
    /// Add a staff member to a store.
    pub async fn new_staff(
        &self,
        store_id: Uuid,
        name: &str,
        position: Option<&str>,
        user_id: &str,
    ) -> ResultLedger<Vec<StaffMember>> {
        let name = normalize_required_text(name, "staff name")?;
        let member = StaffMember::new(store_id, name, normalize_optional_text(position), Utc::now());

        with_tx!(self, |db_tx| {
            self.require_store(&db_tx, store_id, user_id).await?;
            staff_members::ActiveModel::from(&member)
                .insert(&db_tx)
                .await?;
            self.load_staff(&db_tx, store_id).await
        })
    }

    /// List a store's staff roster.
    pub async fn staff(&self, store_id: Uuid, user_id: &str) -> ResultLedger<Vec<StaffMember>> {
        with_tx!(self, |db_tx| {
            self.require_store(&db_tx, store_id, user_id).await?;
            self.load_staff(&db_tx, store_id).await
        })
    }

    /// Edit a staff member's profile fields.
    pub async fn edit_staff(&self, cmd: StaffEditCmd) -> ResultLedger<Vec<StaffMember>> {
        with_tx!(self, |db_tx| {
            let model = self.require_staff(&db_tx, cmd.staff_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, &cmd.user_id).await?;

            let mut active = staff_members::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(name) = cmd.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_text(name, "staff name")?);
            }
            if let Some(position) = cmd.position.as_deref() {
                active.position = ActiveValue::Set(normalize_optional_text(Some(position)));
            }
            if let Some(is_active) = cmd.active {
                active.active = ActiveValue::Set(is_active);
            }
            active.update(&db_tx).await?;

            self.load_staff(&db_tx, store_id).await
        })
    }

    /// Remove a staff member.
    pub async fn remove_staff(
        &self,
        staff_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Vec<StaffMember>> {
        with_tx!(self, |db_tx| {
            let model = self.require_staff(&db_tx, staff_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, user_id).await?;

            staff_members::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;

            self.load_staff(&db_tx, store_id).await
        })
    }

    /// Issue a cash advance to a staff member, due 30 days out.
    ///
    /// A member carries at most one loan at a time: issuing is rejected while
    /// an active loan exists, and replaces a settled one.
    pub async fn issue_loan(
        &self,
        staff_id: Uuid,
        amount: MoneyCents,
        notes: Option<&str>,
        user_id: &str,
    ) -> ResultLedger<Vec<StaffMember>> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "loan amount must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_staff(&db_tx, staff_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, user_id).await?;

            let member = StaffMember::try_from(model.clone())?;
            if member.loan.as_ref().is_some_and(StaffLoan::is_active) {
                return Err(LedgerError::InvalidAmount(
                    "staff member already has an active loan".to_string(),
                ));
            }

            let date_issued = Utc::now().date_naive();
            let due_date = date_issued
                .checked_add_days(Days::new(LOAN_TERM_DAYS))
                .ok_or_else(|| LedgerError::InvalidAmount("due date overflow".to_string()))?;

            let active = staff_members::ActiveModel {
                id: ActiveValue::Set(model.id),
                loan_amount_minor: ActiveValue::Set(Some(amount.cents())),
                loan_repaid_minor: ActiveValue::Set(Some(0)),
                loan_issued: ActiveValue::Set(Some(date_issued)),
                loan_due: ActiveValue::Set(Some(due_date)),
                loan_status: ActiveValue::Set(Some(LoanStatus::Active.as_str().to_string())),
                loan_notes: ActiveValue::Set(normalize_optional_text(notes)),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            self.load_staff(&db_tx, store_id).await
        })
    }

    /// Record a repayment against a member's active loan. The loan flips to
    /// paid once the repaid total covers the amount.
    pub async fn record_loan_payment(
        &self,
        staff_id: Uuid,
        amount: MoneyCents,
        user_id: &str,
    ) -> ResultLedger<Vec<StaffMember>> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "payment amount must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_staff(&db_tx, staff_id).await?;
            let store_id = parse_uuid(&model.store_id, "store")?;
            self.require_store(&db_tx, store_id, user_id).await?;

            let member = StaffMember::try_from(model.clone())?;
            let Some(loan) = member.loan.filter(StaffLoan::is_active) else {
                return Err(LedgerError::InvalidAmount(
                    "no active loan for this staff member".to_string(),
                ));
            };

            let repaid = loan.repaid.checked_add(amount).ok_or_else(|| {
                LedgerError::InvalidAmount("loan repayment overflow".to_string())
            })?;
            let status = if repaid >= loan.amount {
                LoanStatus::Paid
            } else {
                LoanStatus::Active
            };

            let active = staff_members::ActiveModel {
                id: ActiveValue::Set(model.id),
                loan_repaid_minor: ActiveValue::Set(Some(repaid.cents())),
                loan_status: ActiveValue::Set(Some(status.as_str().to_string())),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            self.load_staff(&db_tx, store_id).await
        })
    }

    async fn load_staff(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: Uuid,
    ) -> ResultLedger<Vec<StaffMember>> {
        let models = staff_members::Entity::find()
            .filter(staff_members::Column::StoreId.eq(store_id.to_string()))
            .order_by_asc(staff_members::Column::Name)
            .all(db_tx)
            .await?;
        models.into_iter().map(StaffMember::try_from).collect()
    }
}
