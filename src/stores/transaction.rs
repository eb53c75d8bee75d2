//! Defines the transaction store trait.

use crate::{
    Error, UserId,
    models::{NewTransaction, Transaction},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore: Send + Sync {
    /// Retrieve all of `user`'s transactions in storage order.
    fn transactions(&self, user: UserId) -> Result<Vec<Transaction>, Error>;

    /// Create a new transaction for `user` and adjust the named account's
    /// balance by the transaction amount (added for income, subtracted
    /// for expenses).
    ///
    /// Implementers must apply the insert and the balance adjustment
    /// atomically: a failure of either write leaves the store untouched.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - [Error::UnknownAccount] if the account does not exist or belongs
    ///   to another user.
    fn create_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error>;
}
