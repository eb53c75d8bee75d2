//! Defines the car store trait.

use crate::{
    Error, UserId,
    models::{Car, NewCar},
};

/// Handles the creation and retrieval of cars.
pub trait CarStore: Send + Sync {
    /// Retrieve all of `user`'s cars in storage order.
    fn cars(&self, user: UserId) -> Result<Vec<Car>, Error>;

    /// Add a new car to `user`'s garage.
    fn create_car(&self, user: UserId, new_car: NewCar) -> Result<Car, Error>;
}
