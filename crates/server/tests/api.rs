use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();

    let engine = Engine::builder().database(db.clone()).build();
    router(ServerState {
        engine: std::sync::Arc::new(engine),
        db,
    })
}

fn basic_auth() -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode("alice:password");
    format!("Basic {encoded}")
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth())
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_store(app: &Router, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/stores",
            Some(json!({ "name": name, "address": "1 Main St", "notes": null })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["id"].as_str().unwrap().to_string()
}

fn record_payload(store_id: &str, date: &str, amount_minor: i64) -> Value {
    json!({
        "store_id": store_id,
        "date": date,
        "revenue_lines": [{
            "source_id": uuid::Uuid::new_v4(),
            "source_name": "Pinball",
            "amount_minor": amount_minor,
        }],
        "expense_lines": [],
        "actual_cash_count_minor": null,
        "notes": null,
    })
}

#[tokio::test]
async fn requests_without_credentials_are_unauthorized() {
    let app = app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/stores")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbled_credentials_are_unauthorized() {
    let app = app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/stores")
        .header(header::AUTHORIZATION, "Basic %%%not-base64%%%")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app().await;

    let encoded = base64::engine::general_purpose::STANDARD.encode("alice:wrong");
    let request = Request::builder()
        .method("GET")
        .uri("/stores")
        .header(header::AUTHORIZATION, format!("Basic {encoded}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_store_appears_in_listing() {
    let app = app().await;
    create_store(&app, "Arcade Downtown").await;

    let response = app.oneshot(authed("GET", "/stores", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let stores = body["stores"].as_array().unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["name"], "Arcade Downtown");
    assert_eq!(stores[0]["active"], true);
}

#[tokio::test]
async fn record_creation_returns_ledger_with_running_balances() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-01", 5000)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-02", 3000)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let records = body["records"].as_array().unwrap();
    // Most recent date first.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["date"], "2026-03-02");
    assert_eq!(records[0]["cash_balance_minor"], 8000);
    assert_eq!(records[1]["date"], "2026-03-01");
    assert_eq!(records[1]["cash_balance_minor"], 5000);
}

#[tokio::test]
async fn duplicate_date_is_a_conflict() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-01", 5000)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-01", 100)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn negative_expense_is_unprocessable() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let payload = json!({
        "store_id": store_id,
        "date": "2026-03-01",
        "revenue_lines": [],
        "expense_lines": [{
            "description": "refund",
            "amount_minor": -500,
        }],
        "actual_cash_count_minor": null,
        "notes": null,
    });
    let response = app
        .oneshot(authed("POST", "/records", Some(payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn editing_a_record_reflows_later_balances() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-01", 5000)),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let first_id = body["records"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-02", 3000)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json!({
        "revenue_lines": [{
            "source_id": uuid::Uuid::new_v4(),
            "source_name": "Pinball",
            "amount_minor": 1000,
        }],
    });
    let response = app
        .oneshot(authed(
            "PATCH",
            &format!("/records/{first_id}"),
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let records = body["records"].as_array().unwrap();
    assert_eq!(records[1]["cash_balance_minor"], 1000);
    assert_eq!(records[0]["cash_balance_minor"], 4000);
}

#[tokio::test]
async fn deleting_a_record_returns_the_remaining_ledger() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-01", 5000)),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let first_id = body["records"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/records",
            Some(record_payload(&store_id, "2026-03-02", 3000)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed("DELETE", &format!("/records/{first_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["date"], "2026-03-02");
    assert_eq!(records[0]["cash_balance_minor"], 3000);
}

#[tokio::test]
async fn unknown_store_is_not_found() {
    let app = app().await;

    let uri = format!("/stores/{}/ledger", uuid::Uuid::new_v4());
    let response = app.oneshot(authed("GET", &uri, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn create_staff(app: &Router, store_id: &str, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/stores/{store_id}/staff"),
            Some(json!({ "name": name, "position": "attendant" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let member = body["staff"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == name)
        .unwrap();
    member["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn staff_roster_reflects_creation_and_removal() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;
    let staff_id = create_staff(&app, &store_id, "Bob").await;
    create_staff(&app, &store_id, "Carol").await;

    let response = app
        .clone()
        .oneshot(authed("GET", &format!("/stores/{store_id}/staff"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let roster = body["staff"].as_array().unwrap();
    assert_eq!(roster.len(), 2);
    // Ordered by name.
    assert_eq!(roster[0]["name"], "Bob");
    assert_eq!(roster[1]["name"], "Carol");
    assert_eq!(roster[0]["active"], true);
    assert!(roster[0]["loan"].is_null());

    let response = app
        .oneshot(authed("DELETE", &format!("/staff/{staff_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let roster = body["staff"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["name"], "Carol");
}

#[tokio::test]
async fn staff_edit_updates_profile_fields() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;
    let staff_id = create_staff(&app, &store_id, "Bob").await;

    let response = app
        .oneshot(authed(
            "PATCH",
            &format!("/staff/{staff_id}"),
            Some(json!({ "position": "manager", "active": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let roster = body["staff"].as_array().unwrap();
    assert_eq!(roster[0]["name"], "Bob");
    assert_eq!(roster[0]["position"], "manager");
    assert_eq!(roster[0]["active"], false);
}

#[tokio::test]
async fn loan_lifecycle_flows_through_payments() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;
    let staff_id = create_staff(&app, &store_id, "Bob").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/staff/{staff_id}/loan"),
            Some(json!({ "amount_minor": 10_000, "notes": "till float" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let loan = &body["staff"][0]["loan"];
    assert_eq!(loan["amount_minor"], 10_000);
    assert_eq!(loan["repaid_minor"], 0);
    assert_eq!(loan["status"], "active");

    // A second loan is rejected while one is outstanding.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/staff/{staff_id}/loan"),
            Some(json!({ "amount_minor": 500, "notes": null })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/staff/{staff_id}/loan/payments"),
            Some(json!({ "amount_minor": 4000 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["staff"][0]["loan"]["repaid_minor"], 4000);
    assert_eq!(body["staff"][0]["loan"]["status"], "active");

    let response = app
        .oneshot(authed(
            "POST",
            &format!("/staff/{staff_id}/loan/payments"),
            Some(json!({ "amount_minor": 6000 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["staff"][0]["loan"]["status"], "paid");
}

#[tokio::test]
async fn unknown_staff_member_is_not_found() {
    let app = app().await;
    create_store(&app, "Arcade").await;

    let response = app
        .oneshot(authed(
            "PATCH",
            &format!("/staff/{}", uuid::Uuid::new_v4()),
            Some(json!({ "active": false })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_store_disappears_from_listing() {
    let app = app().await;
    let store_id = create_store(&app, "Arcade").await;

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/stores/{store_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(authed("GET", "/stores", None)).await.unwrap();
    let body = json_body(response).await;
    assert!(body["stores"].as_array().unwrap().is_empty());
}
