//! Aura Finance is a web app for tracking personal finances and vehicle
//! expenses.
//!
//! This library provides the application core behind the REST API: per-user
//! stores for the six data collections (accounts, transactions, savings
//! goals, cars, refuelings and service records), an aggregation hub that
//! keeps an in-memory snapshot of all six in sync with the database, user
//! preferences with localization and currency formatting, and a streaming
//! bridge to the AI assistant.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

pub mod assistant;
pub mod dashboard;
pub mod garage;
pub mod hub;
pub mod models;
pub mod settings;
pub mod stores;

mod app_state;
mod auth;
mod db;
mod routing;

pub use app_state::AppState;
pub use auth::{AuthSession, UserId};
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::models::AccountId;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No identity is currently signed in.
    ///
    /// Every data access operation resolves the current identity first and
    /// fails with this error, without touching storage, when there is none.
    #[error("no user is signed in")]
    Unauthenticated,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., ID) are correct and that the resource has been
    /// created. Internally, this error may occur when a query returns no
    /// rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A transaction was created with a zero or negative amount.
    ///
    /// Amounts are always positive; the transaction kind decides the sign
    /// applied to the account balance.
    #[error("transaction amounts must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// A transaction referenced an account that does not exist or belongs
    /// to another user.
    #[error("account {0} does not exist for the current user")]
    UnknownAccount(AccountId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(#[from] rusqlite::Error),

    /// The local preference file could not be read or written.
    #[error("could not access the preference file: {0}")]
    PreferenceFile(String),

    /// A value could not be serialized to or deserialized from JSON.
    #[error("could not process JSON: {0}")]
    Json(String),

    /// The assistant was queried but no AI provider is configured.
    #[error("the AI assistant is not configured")]
    AssistantUnavailable,

    /// The AI provider rejected or interrupted a streaming request.
    ///
    /// The string carries the provider detail for logging; user-facing
    /// surfaces should show a generic message instead.
    #[error("assistant stream failed: {0}")]
    AssistantStream(String),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::NonPositiveAmount(_) | Error::UnknownAccount(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::AssistantUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::SqlError(_)
            | Error::PreferenceFile(_)
            | Error::Json(_)
            | Error::AssistantStream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
