//! Creates the application's database schema.
//!
//! Every table carries a `user_id` column that scopes rows to their owner.
//! Users themselves are managed by the authentication collaborator, so
//! `user_id` is stored as an opaque integer rather than a foreign key.

use rusqlite::Connection;

use crate::Error;

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            balance REAL NOT NULL,
            currency TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            account_id INTEGER NOT NULL REFERENCES accounts(id),
            date TEXT NOT NULL,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS goals (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            end_date TEXT
        );

        CREATE TABLE IF NOT EXISTS cars (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            make TEXT NOT NULL,
            model TEXT NOT NULL,
            year INTEGER NOT NULL,
            vin TEXT,
            license_plate TEXT,
            photo_url TEXT
        );

        CREATE TABLE IF NOT EXISTS refuelings (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            car_id INTEGER NOT NULL REFERENCES cars(id),
            date TEXT NOT NULL,
            mileage INTEGER NOT NULL,
            liters REAL NOT NULL,
            price_per_liter REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS service_records (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            car_id INTEGER NOT NULL REFERENCES cars(id),
            date TEXT NOT NULL,
            mileage INTEGER NOT NULL,
            service_type TEXT NOT NULL,
            parts_cost REAL NOT NULL,
            labor_cost REAL NOT NULL,
            notes TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS user_preferences (
            user_id INTEGER PRIMARY KEY,
            theme TEXT NOT NULL,
            language TEXT NOT NULL,
            currency TEXT NOT NULL
        );",
    )?;

    Ok(())
}
