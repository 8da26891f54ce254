//! Store API endpoints.

use api_types::store::{StoreNew, StoreView, StoresResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::Store;

fn store_view(store: Store) -> StoreView {
    StoreView {
        id: store.id,
        name: store.name,
        address: store.address,
        notes: store.notes,
        active: store.active,
    }
}

/// Handle requests for creating a new store.
pub async fn store_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StoreNew>,
) -> Result<Json<StoreView>, ServerError> {
    let store = state
        .engine
        .new_store(
            &payload.name,
            &payload.address,
            payload.notes.as_deref(),
            &user.username,
        )
        .await?;

    Ok(Json(store_view(store)))
}

/// Handle requests for listing the caller's stores.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<StoresResponse>, ServerError> {
    let stores = state.engine.stores(&user.username).await?;

    Ok(Json(StoresResponse {
        stores: stores.into_iter().map(store_view).collect(),
    }))
}

/// Handle requests for deleting a store and its ledger.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_store(store_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
