//! Staff roster API endpoints.

use api_types::staff::{
    LoanNew, LoanPayment, LoanView, StaffEdit, StaffNew, StaffResponse, StaffView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{MoneyCents, StaffEditCmd, StaffMember};

fn staff_view(member: StaffMember) -> StaffView {
    StaffView {
        id: member.id,
        store_id: member.store_id,
        name: member.name,
        position: member.position,
        active: member.active,
        loan: member.loan.map(|loan| LoanView {
            amount_minor: loan.amount.cents(),
            repaid_minor: loan.repaid.cents(),
            date_issued: loan.date_issued,
            due_date: loan.due_date,
            status: loan.status.as_str().to_string(),
            notes: loan.notes,
        }),
        created_at: member.created_at,
    }
}

fn staff_response(roster: Vec<StaffMember>) -> Json<StaffResponse> {
    Json(StaffResponse {
        staff: roster.into_iter().map(staff_view).collect(),
    })
}

/// Handle requests for adding a staff member to a store.
pub async fn staff_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<StaffNew>,
) -> Result<Json<StaffResponse>, ServerError> {
    let roster = state
        .engine
        .new_staff(
            store_id,
            &payload.name,
            payload.position.as_deref(),
            &user.username,
        )
        .await?;

    Ok(staff_response(roster))
}

/// Handle requests for listing a store's staff roster.
pub async fn roster(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
) -> Result<Json<StaffResponse>, ServerError> {
    let roster = state.engine.staff(store_id, &user.username).await?;

    Ok(staff_response(roster))
}

/// Handle requests for editing a staff member's profile.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<StaffEdit>,
) -> Result<Json<StaffResponse>, ServerError> {
    let mut cmd = StaffEditCmd::new(staff_id, &user.username);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(position) = payload.position {
        cmd = cmd.position(position);
    }
    if let Some(active) = payload.active {
        cmd = cmd.active(active);
    }

    let roster = state.engine.edit_staff(cmd).await?;

    Ok(staff_response(roster))
}

/// Handle requests for removing a staff member.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<StaffResponse>, ServerError> {
    let roster = state.engine.remove_staff(staff_id, &user.username).await?;

    Ok(staff_response(roster))
}

/// Handle requests for issuing a cash advance to a staff member.
pub async fn loan_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<LoanNew>,
) -> Result<Json<StaffResponse>, ServerError> {
    let roster = state
        .engine
        .issue_loan(
            staff_id,
            MoneyCents::new(payload.amount_minor),
            payload.notes.as_deref(),
            &user.username,
        )
        .await?;

    Ok(staff_response(roster))
}

/// Handle requests for recording a repayment against a staff member's loan.
pub async fn loan_payment(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<LoanPayment>,
) -> Result<Json<StaffResponse>, ServerError> {
    let roster = state
        .engine
        .record_loan_payment(
            staff_id,
            MoneyCents::new(payload.amount_minor),
            &user.username,
        )
        .await?;

    Ok(staff_response(roster))
}
