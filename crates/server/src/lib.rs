use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::LedgerError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod records;
mod server;
mod staff;
mod stores;
mod user;

pub mod types {
    pub mod record {
        pub use api_types::record::{
            ExpenseCategory, ExpenseLine, LedgerResponse, RecordCreate, RecordEdit, RecordView,
            RevenueLine,
        };
    }

    pub mod store {
        pub use api_types::store::{StoreNew, StoreView, StoresResponse};
    }

    pub mod staff {
        pub use api_types::staff::{
            LoanNew, LoanPayment, LoanView, StaffEdit, StaffNew, StaffResponse, StaffView,
        };
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::RecordNotFound(_)
        | LedgerError::StoreNotFound(_)
        | LedgerError::StaffNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::DuplicateDate(_) => StatusCode::CONFLICT,
        LedgerError::InvalidAmount(_) | LedgerError::InvalidId(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LedgerError::Persistence { .. } | LedgerError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        err @ LedgerError::Persistence { .. } => {
            tracing::error!("recalculation error: {err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::RecordNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = ServerError::from(LedgerError::StoreNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = ServerError::from(LedgerError::StaffNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_date_maps_to_409() {
        let res = ServerError::from(LedgerError::DuplicateDate(day(10))).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ledger_validation_maps_to_422() {
        let res = ServerError::from(LedgerError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn persistence_maps_to_500_with_generic_message() {
        let err = LedgerError::Persistence {
            applied_through: Some(day(10)),
            failed_at: day(11),
            source: sea_orm::DbErr::Custom("disk full".to_string()),
        };
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
