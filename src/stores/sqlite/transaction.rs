//! Implements the SQLite backed transaction store.
//!
//! Creating a transaction also moves the named account's balance. The
//! original design issued these as two independent writes, which could
//! leave the balance and the history inconsistent if the process died
//! between them; here both run inside one SQL transaction.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{NewTransaction, Transaction, TransactionKind},
    stores::{TransactionStore, sqlite::SQLiteStore, sqlite::parse_column},
};

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let kind: String = row.get(1)?;

    Ok(Transaction {
        id: row.get(0)?,
        kind: parse_column(&kind, 1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        account_id: row.get(4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
    })
}

const COLUMNS: &str = "id, kind, amount, category, account_id, date, notes";

impl TransactionStore for SQLiteStore {
    fn transactions(&self, user: UserId) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection();

        let transactions = connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM transactions WHERE user_id = ?1"
            ))?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn create_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        if new_transaction.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(new_transaction.amount));
        }

        let connection = self.connection();
        let sql_transaction = connection.unchecked_transaction()?;

        let delta = match new_transaction.kind {
            TransactionKind::Income => new_transaction.amount,
            TransactionKind::Expense => -new_transaction.amount,
        };

        // Scoping the update by user id makes accounts owned by other
        // users indistinguishable from missing ones.
        let updated = sql_transaction.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2 AND user_id = ?3",
            (delta, new_transaction.account_id, user),
        )?;

        if updated == 0 {
            return Err(Error::UnknownAccount(new_transaction.account_id));
        }

        let created = sql_transaction
            .prepare(&format!(
                "INSERT INTO transactions (user_id, kind, amount, category, account_id, date, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    user,
                    new_transaction.kind.as_str(),
                    new_transaction.amount,
                    &new_transaction.category,
                    new_transaction.account_id,
                    new_transaction.date,
                    &new_transaction.notes,
                ),
                map_row,
            )?;

        sql_transaction.commit()?;

        Ok(created)
    }
}
