//! End-to-end tests of the API routes against an in-memory database.

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use aura_finance_rs::{
    AppState, AuthSession, build_router,
    hub::DataHub,
    initialize_db,
    settings::{SettingsService, SqlitePreferenceStore},
    stores::SQLiteStore,
};

fn test_server(signed_in: bool) -> TestServer {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize_db(&connection).expect("Could not apply schema");
    let connection = Arc::new(Mutex::new(connection));

    let auth = AuthSession::new();
    let settings = SettingsService::new(SqlitePreferenceStore::new(connection.clone()));
    let hub = DataHub::new(SQLiteStore::new(connection), auth.clone());

    if signed_in {
        auth.sign_in(1);
        settings.load(1).expect("Could not load preferences");
    }

    let state = AppState {
        auth,
        settings,
        hub,
        assistant: None,
    };

    TestServer::new(build_router(state))
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("Could not format timestamp")
}

#[tokio::test]
async fn health_returns_ok() {
    let server = test_server(false);

    server.get("/api/health").await.assert_status_ok();
}

#[tokio::test]
async fn data_routes_require_a_signed_in_user() {
    let server = test_server(false);

    server.get("/api/snapshot").await.assert_status_unauthorized();
    server
        .post("/api/transactions")
        .json(&json!({
            "kind": "income",
            "amount": 50.0,
            "category": "Salary",
            "accountId": 1,
            "date": now_rfc3339(),
        }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn creating_an_account_updates_the_snapshot() {
    let server = test_server(true);

    let response = server
        .post("/api/accounts")
        .json(&json!({
            "name": "Main Bank",
            "balance": 7850.55,
            "currency": "USD",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let snapshot: Value = server.get("/api/snapshot").await.json();

    assert_eq!(snapshot["isLoading"], json!(false));
    assert_eq!(snapshot["stale"], json!([]));
    assert_eq!(snapshot["snapshot"]["accounts"][0]["name"], "Main Bank");
    assert_eq!(snapshot["snapshot"]["accounts"][0]["balance"], 7850.55);
}

#[tokio::test]
async fn a_transaction_moves_the_balance_and_the_dashboard() {
    let server = test_server(true);

    let account: Value = server
        .post("/api/accounts")
        .json(&json!({
            "name": "Main Bank",
            "balance": 100.0,
            "currency": "USD",
        }))
        .await
        .json();

    server
        .post("/api/transactions")
        .json(&json!({
            "kind": "income",
            "amount": 50.0,
            "category": "Salary",
            "accountId": account["id"],
            "date": now_rfc3339(),
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let dashboard: Value = server.get("/api/dashboard").await.json();

    assert_eq!(dashboard["totalBalance"], 150.0);
    assert_eq!(dashboard["monthlyIncome"], 50.0);
    assert_eq!(dashboard["monthlyExpenses"], 0.0);
}

#[tokio::test]
async fn a_non_positive_transaction_amount_is_rejected() {
    let server = test_server(true);

    let account: Value = server
        .post("/api/accounts")
        .json(&json!({
            "name": "Main Bank",
            "balance": 100.0,
            "currency": "USD",
        }))
        .await
        .json();

    server
        .post("/api/transactions")
        .json(&json!({
            "kind": "expense",
            "amount": 0.0,
            "category": "Groceries",
            "accountId": account["id"],
            "date": now_rfc3339(),
        }))
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn goals_can_be_created_and_deleted() {
    let server = test_server(true);

    let goal: Value = server
        .post("/api/goals")
        .json(&json!({
            "name": "Vacation to Japan",
            "targetAmount": 8000.0,
            "endDate": "2024-07-01",
        }))
        .await
        .json();

    assert_eq!(goal["currentAmount"], 0.0);

    server
        .delete(&format!("/api/goals/{}", goal["id"]))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let snapshot: Value = server.get("/api/snapshot").await.json();
    assert_eq!(snapshot["snapshot"]["goals"], json!([]));
}

#[tokio::test]
async fn deleting_a_missing_goal_is_not_found() {
    let server = test_server(true);

    server
        .delete("/api/goals/999")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn the_garage_reports_costs_per_car() {
    let server = test_server(true);

    let car: Value = server
        .post("/api/cars")
        .json(&json!({
            "make": "Tesla",
            "model": "Model Y",
            "year": 2023,
        }))
        .await
        .json();

    for (mileage, liters, price) in [(1000, 40.0, 0.15), (1500, 50.0, 0.16)] {
        server
            .post("/api/refuelings")
            .json(&json!({
                "carId": car["id"],
                "date": "2023-10-01",
                "mileage": mileage,
                "liters": liters,
                "pricePerLiter": price,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    server
        .post("/api/services")
        .json(&json!({
            "carId": car["id"],
            "date": "2023-09-15",
            "mileage": 1200,
            "type": "Tire Rotation",
            "partsCost": 20.0,
            "laborCost": 50.0,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let reports: Value = server.get("/api/garage").await.json();

    assert_eq!(reports[0]["car"]["make"], "Tesla");
    assert_eq!(reports[0]["costs"]["fuelCost"], 14.0);
    assert_eq!(reports[0]["costs"]["serviceCost"], 70.0);
    assert_eq!(reports[0]["costs"]["totalCost"], 84.0);
}

#[tokio::test]
async fn preferences_start_at_defaults_and_persist_changes() {
    let server = test_server(true);

    let preferences: Value = server.get("/api/preferences").await.json();
    assert_eq!(
        preferences,
        json!({ "theme": "light", "language": "en", "currency": "USD" })
    );

    server
        .put("/api/preferences")
        .json(&json!({ "theme": "dark", "language": "uk", "currency": "UAH" }))
        .await
        .assert_status_ok();

    let preferences: Value = server.get("/api/preferences").await.json();
    assert_eq!(preferences["theme"], "dark");
    assert_eq!(preferences["language"], "uk");
    assert_eq!(preferences["currency"], "UAH");
}

#[tokio::test]
async fn the_assistant_is_unavailable_without_a_provider() {
    let server = test_server(true);

    server
        .post("/api/assistant")
        .json(&json!({ "question": "How are my savings going?" }))
        .await
        .assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}
