//! Derived cost views over the garage: per-car totals, running costs
//! and fuel consumption.
//!
//! Like the dashboard, everything here is computed from a cached
//! [Snapshot](crate::hub::Snapshot).

use serde::Serialize;
use time::Date;

use crate::{
    dashboard::{last_six_months, short_month},
    models::{Car, CarId, Refueling, ServiceRecord},
};

/// Aggregated lifetime costs for one car.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarCosts {
    /// Total spent on fuel.
    pub fuel_cost: f64,
    /// Total spent on parts and labor.
    pub service_cost: f64,
    /// Fuel and service combined.
    pub total_cost: f64,
    /// Total cost divided by the distance covered by the recorded
    /// odometer readings, or zero with fewer than two readings.
    pub cost_per_km: f64,
    /// Average fuel consumption in liters per 100 km, or zero with
    /// fewer than two odometer readings.
    pub avg_consumption: f64,
}

/// One car together with its aggregated costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarReport {
    /// The car.
    pub car: Car,
    /// Its aggregated costs.
    pub costs: CarCosts,
    /// Fuel and service spending for the last six months, oldest
    /// first.
    pub monthly_costs: Vec<MonthlyCost>,
}

/// Fuel and service spending for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    /// A short label for the month, e.g. "Oct 2023".
    pub month: String,
    /// Fuel spending in the month.
    pub fuel: f64,
    /// Service spending in the month.
    pub service: f64,
}

/// Compute a report for every car as of `today`.
pub fn summarize(
    cars: &[Car],
    refuelings: &[Refueling],
    service_records: &[ServiceRecord],
    today: Date,
) -> Vec<CarReport> {
    cars.iter()
        .map(|car| CarReport {
            car: car.clone(),
            costs: car_costs(car.id, refuelings, service_records),
            monthly_costs: monthly_costs(car.id, refuelings, service_records, today),
        })
        .collect()
}

/// Aggregate the lifetime costs of the car with `car_id`.
pub fn car_costs(
    car_id: CarId,
    refuelings: &[Refueling],
    service_records: &[ServiceRecord],
) -> CarCosts {
    let refuelings: Vec<&Refueling> = refuelings
        .iter()
        .filter(|refueling| refueling.car_id == car_id)
        .collect();
    let service_records: Vec<&ServiceRecord> = service_records
        .iter()
        .filter(|record| record.car_id == car_id)
        .collect();

    let fuel_cost: f64 = refuelings
        .iter()
        .map(|refueling| refueling.liters * refueling.price_per_liter)
        .sum();
    let service_cost: f64 = service_records
        .iter()
        .map(|record| record.parts_cost + record.labor_cost)
        .sum();
    let total_cost = fuel_cost + service_cost;

    let mileages: Vec<i64> = refuelings
        .iter()
        .map(|refueling| refueling.mileage)
        .chain(service_records.iter().map(|record| record.mileage))
        .collect();

    // A distance needs at least two odometer readings.
    let distance = match (mileages.iter().min(), mileages.iter().max()) {
        (Some(min), Some(max)) if mileages.len() > 1 => (max - min) as f64,
        _ => 0.0,
    };

    let (cost_per_km, avg_consumption) = if distance > 0.0 {
        let total_liters: f64 = refuelings.iter().map(|refueling| refueling.liters).sum();

        (total_cost / distance, total_liters / distance * 100.0)
    } else {
        (0.0, 0.0)
    };

    CarCosts {
        fuel_cost,
        service_cost,
        total_cost,
        cost_per_km,
        avg_consumption,
    }
}

fn monthly_costs(
    car_id: CarId,
    refuelings: &[Refueling],
    service_records: &[ServiceRecord],
    today: Date,
) -> Vec<MonthlyCost> {
    last_six_months(today)
        .into_iter()
        .map(|(year, month)| {
            let in_month = |date: Date| date.year() == year && date.month() == month;

            MonthlyCost {
                month: format!("{} {year}", short_month(month)),
                fuel: refuelings
                    .iter()
                    .filter(|refueling| refueling.car_id == car_id && in_month(refueling.date))
                    .map(|refueling| refueling.liters * refueling.price_per_liter)
                    .sum(),
                service: service_records
                    .iter()
                    .filter(|record| record.car_id == car_id && in_month(record.date))
                    .map(|record| record.parts_cost + record.labor_cost)
                    .sum(),
            }
        })
        .collect()
}
