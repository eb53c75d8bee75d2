use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{AccountId, UnknownVariant};

/// Alias for the integer type used to identify transactions.
pub type TransactionId = i64;

/// Whether a transaction adds to or subtracts from an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, added to the account balance.
    Income,
    /// Money going out, subtracted from the account balance.
    Expense,
}

impl TransactionKind {
    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// A single income or expense event against one account.
///
/// Transactions are immutable once created; there is no edit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The id for the transaction.
    pub id: TransactionId,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money, always positive.
    pub amount: f64,
    /// A free text category such as "Groceries" or "Salary".
    pub category: String,
    /// The account the transaction applies to.
    pub account_id: AccountId,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Optional free text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The data needed to create a new [Transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money, must be positive.
    pub amount: f64,
    /// A free text category such as "Groceries" or "Salary".
    pub category: String,
    /// The account the transaction applies to.
    pub account_id: AccountId,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Optional free text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::TransactionKind;

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(kind.as_str().parse::<TransactionKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
