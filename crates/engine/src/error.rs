//! The module contains the errors the engine can throw.
//!
//! Validation errors ([`DuplicateDate`], [`InvalidAmount`]) are detected
//! before any write happens, so the caller never observes partial state for
//! them. [`Persistence`] is raised when the chain recalculation fails partway
//! through; it reports how far the propagation had applied before the
//! enclosing transaction rolled everything back.
//!
//!  [`DuplicateDate`]: LedgerError::DuplicateDate
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`Persistence`]: LedgerError::Persistence
use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger engine custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("a record for {0} already exists in this store")]
    DuplicateDate(NaiveDate),
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("store not found: {0}")]
    StoreNotFound(String),
    #[error("staff member not found: {0}")]
    StaffNotFound(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error(
        "chain recalculation failed at {failed_at} (applied through {})",
        applied_through.map_or_else(|| "anchor".to_string(), |d| d.to_string())
    )]
    Persistence {
        applied_through: Option<NaiveDate>,
        failed_at: NaiveDate,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateDate(a), Self::DuplicateDate(b)) => a == b,
            (Self::RecordNotFound(a), Self::RecordNotFound(b)) => a == b,
            (Self::StoreNotFound(a), Self::StoreNotFound(b)) => a == b,
            (Self::StaffNotFound(a), Self::StaffNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (
                Self::Persistence {
                    applied_through: a1,
                    failed_at: a2,
                    ..
                },
                Self::Persistence {
                    applied_through: b1,
                    failed_at: b2,
                    ..
                },
            ) => a1 == b1 && a2 == b2,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
