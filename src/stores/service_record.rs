//! Defines the service record store trait.

use crate::{
    Error, UserId,
    models::{NewServiceRecord, ServiceRecord},
};

/// Handles the creation and retrieval of service records.
pub trait ServiceRecordStore: Send + Sync {
    /// Retrieve all of `user`'s service records in storage order.
    fn service_records(&self, user: UserId) -> Result<Vec<ServiceRecord>, Error>;

    /// Record a new service visit for one of `user`'s cars.
    fn create_service_record(
        &self,
        user: UserId,
        new_record: NewServiceRecord,
    ) -> Result<ServiceRecord, Error>;
}
