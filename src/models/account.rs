use serde::{Deserialize, Serialize};

use crate::settings::Currency;

/// Alias for the integer type used to identify accounts.
pub type AccountId = i64;

/// The amount of money available in a bank account, savings account or
/// cash wallet.
///
/// The balance is a plain number adjusted directly by transaction writes;
/// there is no audit trail tying it to the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The current balance.
    pub balance: f64,
    /// The currency the balance is denominated in.
    pub currency: Currency,
}

/// The data needed to create a new [Account].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The opening balance.
    pub balance: f64,
    /// The currency the balance is denominated in.
    pub currency: Currency,
}
