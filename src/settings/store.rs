//! Persistence for user preferences.
//!
//! Two variants exist behind one trait: a JSON file on the local device
//! and a per-user row in the application database. Both are written
//! through on every change.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::{Error, UserId, settings::Preferences, stores::parse_column};

/// Loads and saves a user's preferences.
pub trait PreferenceStore: Send + Sync {
    /// Retrieve `user`'s preferences, or `None` if none were ever saved.
    fn load(&self, user: UserId) -> Result<Option<Preferences>, Error>;

    /// Persist `user`'s preferences, replacing any previous value.
    fn save(&self, user: UserId, preferences: &Preferences) -> Result<(), Error>;
}

/// Stores preferences in a JSON file on the local device.
///
/// The file holds one JSON-encoded value per preference name. Each entry
/// is decoded independently: a missing or corrupt entry falls back to the
/// default for that preference instead of failing the whole load. This
/// store is per-device, not per-user, so the user id is ignored.
#[derive(Debug, Clone)]
pub struct LocalPreferenceStore {
    path: PathBuf,
}

impl LocalPreferenceStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// The file is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn decode<T>(entries: &BTreeMap<String, Value>, name: &str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let Some(value) = entries.get(name) else {
            return T::default();
        };

        serde_json::from_value(value.clone()).unwrap_or_else(|error| {
            tracing::warn!("ignoring corrupt preference {name:?}: {error}");
            T::default()
        })
    }
}

impl PreferenceStore for LocalPreferenceStore {
    fn load(&self, _user: UserId) -> Result<Option<Preferences>, Error> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Error::PreferenceFile(error.to_string())),
        };

        let entries: BTreeMap<String, Value> = match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!("preference file is not valid JSON, using defaults: {error}");
                return Ok(None);
            }
        };

        Ok(Some(Preferences {
            theme: Self::decode(&entries, "theme"),
            language: Self::decode(&entries, "language"),
            currency: Self::decode(&entries, "currency"),
        }))
    }

    fn save(&self, _user: UserId, preferences: &Preferences) -> Result<(), Error> {
        let mut entries = BTreeMap::new();
        entries.insert("theme", serde_json::to_value(preferences.theme)?);
        entries.insert("language", serde_json::to_value(preferences.language)?);
        entries.insert("currency", serde_json::to_value(preferences.currency)?);

        let text = serde_json::to_string_pretty(&entries)?;

        std::fs::write(&self.path, text).map_err(|error| Error::PreferenceFile(error.to_string()))
    }
}

/// Stores preferences as one row per user in the application database,
/// written with an upsert.
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePreferenceStore {
    /// Create a store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<Preferences, rusqlite::Error> {
        let theme: String = row.get(0)?;
        let language: String = row.get(1)?;
        let currency: String = row.get(2)?;

        Ok(Preferences {
            theme: parse_column(&theme, 0)?,
            language: parse_column(&language, 1)?,
            currency: parse_column(&currency, 2)?,
        })
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn load(&self, user: UserId) -> Result<Option<Preferences>, Error> {
        let connection = self.connection.lock().unwrap();

        let preferences = connection
            .query_row(
                "SELECT theme, language, currency FROM user_preferences WHERE user_id = ?1",
                [user],
                Self::map_row,
            )
            .optional()?;

        Ok(preferences)
    }

    fn save(&self, user: UserId, preferences: &Preferences) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user_preferences (user_id, theme, language, currency)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                theme = excluded.theme,
                language = excluded.language,
                currency = excluded.currency",
            (
                user,
                preferences.theme.as_str(),
                preferences.language.as_str(),
                preferences.currency.as_str(),
            ),
        )?;

        Ok(())
    }
}
