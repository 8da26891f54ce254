pub use aggregate::{DailyTotals, aggregate};
pub use commands::{RecordCreateCmd, RecordEditCmd, StaffEditCmd};
pub use error::LedgerError;
pub use lines::{ExpenseCategory, ExpenseLine, RevenueLine};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, RecalculatedRecord, RecalculationResult};
pub use records::{FinancialRecord, LedgerSnapshot};
pub use staff::{LoanStatus, StaffLoan, StaffMember};
pub use stores::Store;

mod aggregate;
mod commands;
mod error;
mod lines;
mod money;
mod ops;
mod records;
mod staff;
mod stores;
mod users;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;
