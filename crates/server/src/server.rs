use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{records, staff, stores, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // `typed_get` returns `None` for a missing or malformed header; both
    // cases are a 401.
    let Some(auth_header) = request.headers().typed_get::<Authorization<Basic>>() else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/stores", post(stores::store_new).get(stores::list))
        .route("/stores/{store_id}", delete(stores::remove))
        .route("/stores/{store_id}/ledger", get(records::ledger))
        .route(
            "/stores/{store_id}/staff",
            post(staff::staff_new).get(staff::roster),
        )
        .route(
            "/staff/{staff_id}",
            patch(staff::update).delete(staff::remove),
        )
        .route("/staff/{staff_id}/loan", post(staff::loan_new))
        .route("/staff/{staff_id}/loan/payments", post(staff::loan_payment))
        .route("/records", post(records::record_new))
        .route(
            "/records/{record_id}",
            patch(records::update).delete(records::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}
