//! Defines the state shared between routes.

use crate::{
    AuthSession, assistant::AssistantClient, hub::DataHub, settings::SettingsService,
    stores::DataStore,
};

/// The top-level application state, handed to every route handler.
///
/// Cloning is cheap; all clones share the same services.
#[derive(Clone)]
pub struct AppState<S: DataStore> {
    /// The current identity.
    pub auth: AuthSession,
    /// The active user preferences.
    pub settings: SettingsService,
    /// The cached data snapshot and its mutations.
    pub hub: DataHub<S>,
    /// The AI assistant, when a provider is configured.
    pub assistant: Option<AssistantClient>,
}
