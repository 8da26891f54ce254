//! Command structs for engine operations.
//!
//! These types group parameters for write operations (record create/edit),
//! keeping call sites readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{ExpenseLine, MoneyCents, RevenueLine};

/// Create a daily financial record.
///
/// `money_in`, `money_out`, `daily_profit` and `cash_balance` are not part of
/// the command on purpose: the engine derives them, and caller-supplied
/// balances are ignored.
#[derive(Clone, Debug)]
pub struct RecordCreateCmd {
    pub store_id: Uuid,
    pub date: NaiveDate,
    pub revenue_lines: Vec<RevenueLine>,
    pub expense_lines: Vec<ExpenseLine>,
    pub actual_cash_count: Option<MoneyCents>,
    pub notes: Option<String>,
    pub user_id: String,
}

impl RecordCreateCmd {
    #[must_use]
    pub fn new(store_id: Uuid, user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            store_id,
            date,
            revenue_lines: Vec::new(),
            expense_lines: Vec::new(),
            actual_cash_count: None,
            notes: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn revenue_line(mut self, line: RevenueLine) -> Self {
        self.revenue_lines.push(line);
        self
    }

    #[must_use]
    pub fn expense_line(mut self, line: ExpenseLine) -> Self {
        self.expense_lines.push(line);
        self
    }

    #[must_use]
    pub fn revenue_lines(mut self, lines: Vec<RevenueLine>) -> Self {
        self.revenue_lines = lines;
        self
    }

    #[must_use]
    pub fn expense_lines(mut self, lines: Vec<ExpenseLine>) -> Self {
        self.expense_lines = lines;
        self
    }

    #[must_use]
    pub fn actual_cash_count(mut self, counted: MoneyCents) -> Self {
        self.actual_cash_count = Some(counted);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Edit an existing record.
///
/// `None` fields are left unchanged. A date change is treated as removal from
/// the old position plus insertion at the new one; the recalculation anchor is
/// the earlier of the two dates.
#[derive(Clone, Debug)]
pub struct RecordEditCmd {
    pub record_id: Uuid,
    pub date: Option<NaiveDate>,
    pub revenue_lines: Option<Vec<RevenueLine>>,
    pub expense_lines: Option<Vec<ExpenseLine>>,
    pub actual_cash_count: Option<MoneyCents>,
    pub notes: Option<String>,
    pub user_id: String,
}

impl RecordEditCmd {
    #[must_use]
    pub fn new(record_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            record_id,
            date: None,
            revenue_lines: None,
            expense_lines: None,
            actual_cash_count: None,
            notes: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn revenue_lines(mut self, lines: Vec<RevenueLine>) -> Self {
        self.revenue_lines = Some(lines);
        self
    }

    #[must_use]
    pub fn expense_lines(mut self, lines: Vec<ExpenseLine>) -> Self {
        self.expense_lines = Some(lines);
        self
    }

    #[must_use]
    pub fn actual_cash_count(mut self, counted: MoneyCents) -> Self {
        self.actual_cash_count = Some(counted);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Edit a staff member's profile fields. `None` fields are left unchanged;
/// the loan has its own operations.
#[derive(Clone, Debug)]
pub struct StaffEditCmd {
    pub staff_id: Uuid,
    pub name: Option<String>,
    pub position: Option<String>,
    pub active: Option<bool>,
    pub user_id: String,
}

impl StaffEditCmd {
    #[must_use]
    pub fn new(staff_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            staff_id,
            name: None,
            position: None,
            active: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}
