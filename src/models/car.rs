//! Vehicles and their cost records: refuelings and service visits.

use serde::{Deserialize, Serialize};
use time::Date;

/// Alias for the integer type used to identify cars.
pub type CarId = i64;
/// Alias for the integer type used to identify refuelings.
pub type RefuelingId = i64;
/// Alias for the integer type used to identify service records.
pub type ServiceRecordId = i64;

/// A vehicle in the user's garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// The id for the car.
    pub id: CarId,
    /// The manufacturer, e.g. "Tesla".
    pub make: String,
    /// The model, e.g. "Model Y".
    pub model: String,
    /// The model year.
    pub year: i32,
    /// The vehicle identification number, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    /// The license plate, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    /// A reference to a photo of the car, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// The data needed to create a new [Car].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    /// The manufacturer, e.g. "Tesla".
    pub make: String,
    /// The model, e.g. "Model Y".
    pub model: String,
    /// The model year.
    pub year: i32,
    /// The vehicle identification number, if recorded.
    #[serde(default)]
    pub vin: Option<String>,
    /// The license plate, if recorded.
    #[serde(default)]
    pub license_plate: Option<String>,
    /// A reference to a photo of the car, if any.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A single fill-up of a car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refueling {
    /// The id for the refueling.
    pub id: RefuelingId,
    /// The car that was refueled.
    pub car_id: CarId,
    /// The day of the fill-up.
    #[serde(with = "super::iso_date")]
    pub date: Date,
    /// The odometer reading at the time, in kilometres.
    pub mileage: i64,
    /// How many liters were added.
    pub liters: f64,
    /// The price paid per liter.
    pub price_per_liter: f64,
}

/// The data needed to create a new [Refueling].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRefueling {
    /// The car that was refueled.
    pub car_id: CarId,
    /// The day of the fill-up.
    #[serde(with = "super::iso_date")]
    pub date: Date,
    /// The odometer reading at the time, in kilometres.
    pub mileage: i64,
    /// How many liters were added.
    pub liters: f64,
    /// The price paid per liter.
    pub price_per_liter: f64,
}

/// A maintenance or repair visit for a car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// The id for the service record.
    pub id: ServiceRecordId,
    /// The car that was serviced.
    pub car_id: CarId,
    /// The day of the visit.
    #[serde(with = "super::iso_date")]
    pub date: Date,
    /// The odometer reading at the time, in kilometres.
    pub mileage: i64,
    /// The kind of work done, e.g. "Tire Rotation".
    #[serde(rename = "type")]
    pub service_type: String,
    /// The cost of parts.
    pub parts_cost: f64,
    /// The cost of labor.
    pub labor_cost: f64,
    /// Free text notes.
    pub notes: String,
}

/// The data needed to create a new [ServiceRecord].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRecord {
    /// The car that was serviced.
    pub car_id: CarId,
    /// The day of the visit.
    #[serde(with = "super::iso_date")]
    pub date: Date,
    /// The odometer reading at the time, in kilometres.
    pub mileage: i64,
    /// The kind of work done, e.g. "Tire Rotation".
    #[serde(rename = "type")]
    pub service_type: String,
    /// The cost of parts.
    pub parts_cost: f64,
    /// The cost of labor.
    pub labor_cost: f64,
    /// Free text notes.
    #[serde(default)]
    pub notes: String,
}
