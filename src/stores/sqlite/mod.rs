//! SQLite backed implementations of the store traits.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::models::UnknownVariant;

mod account;
mod car;
mod goal;
mod refueling;
mod service_record;
mod transaction;

/// Stores all six data collections in a SQLite database.
///
/// The connection is shared behind a mutex, so clones of the store hit
/// the same database.
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a store for the SQLite `connection`.
    ///
    /// The schema must already be set up with
    /// [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection.lock().unwrap()
    }
}

/// Parse a TEXT column into one of the crate's enum types, reporting
/// unknown values as a column conversion failure.
pub(crate) fn parse_column<T>(text: &str, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    text.parse().map_err(|error: UnknownVariant| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

#[cfg(test)]
pub(crate) fn get_test_store() -> SQLiteStore {
    let connection = Connection::open_in_memory()
        .expect("Could not initialise in-memory SQLite database");
    crate::db::initialize(&connection).expect("Could not create tables");

    SQLiteStore::new(Arc::new(Mutex::new(connection)))
}
