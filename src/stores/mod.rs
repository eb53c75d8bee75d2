//! Defines the store traits for the six data collections and their SQLite
//! implementations.
//!
//! Every operation takes the owning [UserId](crate::UserId) explicitly:
//! reads filter on it and writes stamp it, so cross-user access is
//! structurally impossible. Resolving the identity (and failing fast
//! without one) is the caller's job; see
//! [DataHub](crate::hub::DataHub).

mod account;
mod car;
mod goal;
mod refueling;
mod service_record;
mod sqlite;
mod transaction;

pub use account::AccountStore;
pub use car::CarStore;
pub use goal::GoalStore;
pub use refueling::RefuelingStore;
pub use service_record::ServiceRecordStore;
pub use sqlite::SQLiteStore;
pub(crate) use sqlite::parse_column;
pub use transaction::TransactionStore;

/// The full data access surface the aggregation hub orchestrates.
///
/// Implemented automatically for any type that implements all six
/// per-collection store traits and can be shared across tasks.
pub trait DataStore:
    AccountStore
    + TransactionStore
    + GoalStore
    + CarStore
    + RefuelingStore
    + ServiceRecordStore
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> DataStore for T where
    T: AccountStore
        + TransactionStore
        + GoalStore
        + CarStore
        + RefuelingStore
        + ServiceRecordStore
        + Clone
        + Send
        + Sync
        + 'static
{
}
