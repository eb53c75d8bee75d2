//! Defines the refueling store trait.

use crate::{
    Error, UserId,
    models::{NewRefueling, Refueling},
};

/// Handles the creation and retrieval of refuelings.
pub trait RefuelingStore: Send + Sync {
    /// Retrieve all of `user`'s refuelings in storage order.
    fn refuelings(&self, user: UserId) -> Result<Vec<Refueling>, Error>;

    /// Record a new refueling for one of `user`'s cars.
    fn create_refueling(
        &self,
        user: UserId,
        new_refueling: NewRefueling,
    ) -> Result<Refueling, Error>;
}
