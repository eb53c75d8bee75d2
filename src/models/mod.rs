//! The domain models for the application's six data collections.
//!
//! All models are owned by a single user; the owning `user_id` lives only
//! in the database and is applied by the stores, so the structs here match
//! what the API serves to clients.

mod account;
mod car;
mod goal;
mod transaction;

pub use account::{Account, AccountId, NewAccount};
pub use car::{
    Car, CarId, NewCar, NewRefueling, NewServiceRecord, Refueling, RefuelingId, ServiceRecord,
    ServiceRecordId,
};
pub use goal::{Goal, GoalId, NewGoal};
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Returned when a stored text value does not match any known enum
/// variant.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unrecognised value {0:?}")]
pub struct UnknownVariant(pub String);
