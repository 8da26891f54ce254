//! Financial record API endpoints.

use api_types::record::{LedgerResponse, RecordCreate, RecordEdit, RecordView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{LedgerSnapshot, MoneyCents, RecordCreateCmd, RecordEditCmd};

fn revenue_line_from_api(line: api_types::record::RevenueLine) -> engine::RevenueLine {
    engine::RevenueLine {
        source_id: line.source_id,
        source_name: line.source_name,
        amount: MoneyCents::new(line.amount_minor),
    }
}

fn expense_line_from_api(line: api_types::record::ExpenseLine) -> engine::ExpenseLine {
    engine::ExpenseLine {
        description: line.description,
        amount: MoneyCents::new(line.amount_minor),
        category: category_from_api(line.category),
    }
}

fn category_from_api(category: api_types::record::ExpenseCategory) -> engine::ExpenseCategory {
    match category {
        api_types::record::ExpenseCategory::Utilities => engine::ExpenseCategory::Utilities,
        api_types::record::ExpenseCategory::Maintenance => engine::ExpenseCategory::Maintenance,
        api_types::record::ExpenseCategory::Supplies => engine::ExpenseCategory::Supplies,
        api_types::record::ExpenseCategory::Payroll => engine::ExpenseCategory::Payroll,
        api_types::record::ExpenseCategory::Other => engine::ExpenseCategory::Other,
    }
}

fn category_to_api(category: engine::ExpenseCategory) -> api_types::record::ExpenseCategory {
    match category {
        engine::ExpenseCategory::Utilities => api_types::record::ExpenseCategory::Utilities,
        engine::ExpenseCategory::Maintenance => api_types::record::ExpenseCategory::Maintenance,
        engine::ExpenseCategory::Supplies => api_types::record::ExpenseCategory::Supplies,
        engine::ExpenseCategory::Payroll => api_types::record::ExpenseCategory::Payroll,
        engine::ExpenseCategory::Other => api_types::record::ExpenseCategory::Other,
    }
}

fn ledger_response(snapshot: LedgerSnapshot) -> LedgerResponse {
    let records = snapshot
        .records
        .into_iter()
        .map(|record| RecordView {
            id: record.id,
            store_id: record.store_id,
            date: record.date,
            revenue_lines: record
                .revenue_lines
                .into_iter()
                .map(|line| api_types::record::RevenueLine {
                    source_id: line.source_id,
                    source_name: line.source_name,
                    amount_minor: line.amount.cents(),
                })
                .collect(),
            expense_lines: record
                .expense_lines
                .into_iter()
                .map(|line| api_types::record::ExpenseLine {
                    description: line.description,
                    amount_minor: line.amount.cents(),
                    category: category_to_api(line.category),
                })
                .collect(),
            money_in_minor: record.money_in.cents(),
            money_out_minor: record.money_out.cents(),
            daily_profit_minor: record.daily_profit.cents(),
            cash_balance_minor: record.cash_balance.cents(),
            actual_cash_count_minor: record.actual_cash_count.map(MoneyCents::cents),
            notes: record.notes,
            created_by: record.created_by,
            updated_by: record.updated_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
        .collect();

    LedgerResponse {
        store_id: snapshot.store_id,
        records,
    }
}

/// Handle requests for creating a new daily record.
pub async fn record_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecordCreate>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let mut cmd = RecordCreateCmd::new(payload.store_id, &user.username, payload.date)
        .revenue_lines(
            payload
                .revenue_lines
                .into_iter()
                .map(revenue_line_from_api)
                .collect(),
        )
        .expense_lines(
            payload
                .expense_lines
                .into_iter()
                .map(expense_line_from_api)
                .collect(),
        );
    if let Some(counted) = payload.actual_cash_count_minor {
        cmd = cmd.actual_cash_count(MoneyCents::new(counted));
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let snapshot = state.engine.create_record(cmd).await?;
    Ok(Json(ledger_response(snapshot)))
}

/// Handle requests for editing an existing record.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(record_id): Path<Uuid>,
    Json(payload): Json<RecordEdit>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let mut cmd = RecordEditCmd::new(record_id, &user.username);
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }
    if let Some(lines) = payload.revenue_lines {
        cmd = cmd.revenue_lines(lines.into_iter().map(revenue_line_from_api).collect());
    }
    if let Some(lines) = payload.expense_lines {
        cmd = cmd.expense_lines(lines.into_iter().map(expense_line_from_api).collect());
    }
    if let Some(counted) = payload.actual_cash_count_minor {
        cmd = cmd.actual_cash_count(MoneyCents::new(counted));
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let snapshot = state.engine.edit_record(cmd).await?;
    Ok(Json(ledger_response(snapshot)))
}

/// Handle requests for deleting a record.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let snapshot = state.engine.delete_record(record_id, &user.username).await?;
    Ok(Json(ledger_response(snapshot)))
}

/// Handle requests for a store's full ledger.
pub async fn ledger(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let snapshot = state.engine.fetch_ledger(store_id, &user.username).await?;
    Ok(Json(ledger_response(snapshot)))
}
