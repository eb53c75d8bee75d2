//! Defines the account store trait.

use crate::{
    Error, UserId,
    models::{Account, NewAccount},
};

/// Handles the creation and retrieval of accounts.
pub trait AccountStore: Send + Sync {
    /// Retrieve all of `user`'s accounts in storage order.
    fn accounts(&self, user: UserId) -> Result<Vec<Account>, Error>;

    /// Create a new account for `user`.
    fn create_account(&self, user: UserId, new_account: NewAccount) -> Result<Account, Error>;
}
