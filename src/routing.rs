//! Defines the API routes and their handlers.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tower_http::trace::TraceLayer;

use crate::{
    AppState, Error,
    assistant::{AssistantEvent, build_financial_context},
    dashboard::{self, DashboardSummary},
    garage::{self, CarReport},
    hub::{Collection, Snapshot},
    models::{
        Account, Car, Goal, GoalId, NewAccount, NewCar, NewGoal, NewRefueling, NewServiceRecord,
        NewTransaction, Refueling, ServiceRecord, Transaction,
    },
    settings::Preferences,
    stores::DataStore,
};

/// Create the router for the application API.
pub fn build_router<S: DataStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/snapshot", get(get_snapshot::<S>))
        .route("/api/dashboard", get(get_dashboard::<S>))
        .route("/api/garage", get(get_garage::<S>))
        .route("/api/accounts", post(create_account::<S>))
        .route("/api/transactions", post(create_transaction::<S>))
        .route("/api/goals", post(create_goal::<S>))
        .route("/api/goals/{id}", axum::routing::delete(delete_goal::<S>))
        .route("/api/cars", post(create_car::<S>))
        .route("/api/refuelings", post(create_refueling::<S>))
        .route("/api/services", post(create_service_record::<S>))
        .route(
            "/api/preferences",
            get(get_preferences::<S>).put(put_preferences::<S>),
        )
        .route("/api/assistant", post(ask_assistant::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// The cached snapshot plus its freshness markers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotResponse {
    is_loading: bool,
    stale: Vec<Collection>,
    snapshot: Snapshot,
}

async fn get_snapshot<S: DataStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<SnapshotResponse>, Error> {
    require_identity(&state)?;

    Ok(Json(SnapshotResponse {
        is_loading: state.hub.is_loading().await,
        stale: state.hub.stale().await,
        snapshot: state.hub.snapshot().await,
    }))
}

async fn get_dashboard<S: DataStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<DashboardSummary>, Error> {
    require_identity(&state)?;
    let snapshot = state.hub.snapshot().await;

    Ok(Json(dashboard::summarize(
        &snapshot.accounts,
        &snapshot.transactions,
        today(),
    )))
}

async fn get_garage<S: DataStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<CarReport>>, Error> {
    require_identity(&state)?;
    let snapshot = state.hub.snapshot().await;

    Ok(Json(garage::summarize(
        &snapshot.cars,
        &snapshot.refuelings,
        &snapshot.service_records,
        today(),
    )))
}

async fn create_account<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let created = state.hub.add_account(new_account).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_transaction<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let created = state.hub.add_transaction(new_transaction).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_goal<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_goal): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>), Error> {
    let created = state.hub.add_goal(new_goal).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_goal<S: DataStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    state.hub.delete_goal(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_car<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_car): Json<NewCar>,
) -> Result<(StatusCode, Json<Car>), Error> {
    let created = state.hub.add_car(new_car).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_refueling<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_refueling): Json<NewRefueling>,
) -> Result<(StatusCode, Json<Refueling>), Error> {
    let created = state.hub.add_refueling(new_refueling).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_service_record<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(new_record): Json<NewServiceRecord>,
) -> Result<(StatusCode, Json<ServiceRecord>), Error> {
    let created = state.hub.add_service_record(new_record).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_preferences<S: DataStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Preferences>, Error> {
    require_identity(&state)?;

    Ok(Json(state.settings.preferences()))
}

async fn put_preferences<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<Preferences>, Error> {
    let user = require_identity(&state)?;
    state.settings.update(user, preferences)?;

    Ok(Json(preferences))
}

#[derive(Deserialize)]
struct AssistantRequest {
    question: String,
}

async fn ask_assistant<S: DataStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<AssistantRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    require_identity(&state)?;
    let assistant = state.assistant.clone().ok_or(Error::AssistantUnavailable)?;

    let preferences = state.settings.preferences();
    let snapshot = state.hub.snapshot().await;
    let context = build_financial_context(&snapshot, preferences.language, preferences.currency);

    let events = assistant.stream_insight(request.question, context, preferences.language);

    let stream = ReceiverStream::new(events).map(|event| {
        Ok(match event {
            AssistantEvent::Chunk(text) => Event::default().event("chunk").data(text),
            AssistantEvent::Error(message) => Event::default().event("error").data(message),
            AssistantEvent::Done => Event::default().event("done").data(""),
        })
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn require_identity<S: DataStore>(state: &AppState<S>) -> Result<crate::UserId, Error> {
    state.auth.current().ok_or(Error::Unauthenticated)
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
