//! Implements the SQLite backed account store.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{Account, NewAccount},
    stores::{AccountStore, sqlite::SQLiteStore, sqlite::parse_column},
};

fn map_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let currency: String = row.get(3)?;

    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: row.get(2)?,
        currency: parse_column(&currency, 3)?,
    })
}

impl AccountStore for SQLiteStore {
    fn accounts(&self, user: UserId) -> Result<Vec<Account>, Error> {
        let connection = self.connection();

        let accounts = connection
            .prepare("SELECT id, name, balance, currency FROM accounts WHERE user_id = ?1")?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    fn create_account(&self, user: UserId, new_account: NewAccount) -> Result<Account, Error> {
        let connection = self.connection();

        let account = connection
            .prepare(
                "INSERT INTO accounts (user_id, name, balance, currency)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, balance, currency",
            )?
            .query_row(
                (
                    user,
                    &new_account.name,
                    new_account.balance,
                    new_account.currency.as_str(),
                ),
                map_row,
            )?;

        Ok(account)
    }
}
