use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use aura_finance_rs::{
    AppState, AuthSession, UserId, assistant::AssistantClient, build_router, graceful_shutdown,
    hub::{DataHub, run_identity_watcher},
    initialize_db,
    settings::{LocalPreferenceStore, SettingsService, SqlitePreferenceStore},
    stores::SQLiteStore,
};

/// The REST API server for Aura Finance.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON file holding the user preferences. When unset,
    /// preferences are stored in the application database instead.
    #[arg(long)]
    preferences_file: Option<PathBuf>,

    /// The id of the user to sign in as.
    #[arg(long, default_value_t = 1)]
    user_id: UserId,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let connection = Connection::open(&args.db_path).expect("Could not open the database.");
    initialize_db(&connection).expect("Could not apply the database schema.");
    let connection = Arc::new(Mutex::new(connection));

    let auth = AuthSession::new();
    let settings = match &args.preferences_file {
        Some(path) => SettingsService::new(LocalPreferenceStore::new(path.clone())),
        None => SettingsService::new(SqlitePreferenceStore::new(connection.clone())),
    };
    let hub = DataHub::new(SQLiteStore::new(connection), auth.clone());

    let assistant = AssistantClient::from_env();
    if assistant.is_none() {
        tracing::info!("AI_API_KEY is not set, the assistant endpoint will be unavailable");
    }

    tokio::spawn(run_identity_watcher(hub.clone(), auth.subscribe()));

    auth.sign_in(args.user_id);
    if let Err(error) = settings.load(args.user_id) {
        tracing::warn!("could not load preferences, falling back to defaults: {error}");
    }

    let state = AppState {
        auth,
        settings,
        hub,
        assistant,
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(build_router(state).into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file))
        .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log.and_then(debug_log))
        .init();
}
