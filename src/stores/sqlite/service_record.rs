//! Implements the SQLite backed service record store.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{NewServiceRecord, ServiceRecord},
    stores::{ServiceRecordStore, sqlite::SQLiteStore},
};

fn map_row(row: &Row) -> Result<ServiceRecord, rusqlite::Error> {
    Ok(ServiceRecord {
        id: row.get(0)?,
        car_id: row.get(1)?,
        date: row.get(2)?,
        mileage: row.get(3)?,
        service_type: row.get(4)?,
        parts_cost: row.get(5)?,
        labor_cost: row.get(6)?,
        notes: row.get(7)?,
    })
}

impl ServiceRecordStore for SQLiteStore {
    fn service_records(&self, user: UserId) -> Result<Vec<ServiceRecord>, Error> {
        let connection = self.connection();

        let records = connection
            .prepare(
                "SELECT id, car_id, date, mileage, service_type, parts_cost, labor_cost, notes
                 FROM service_records WHERE user_id = ?1",
            )?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn create_service_record(
        &self,
        user: UserId,
        new_record: NewServiceRecord,
    ) -> Result<ServiceRecord, Error> {
        let connection = self.connection();

        let record = connection
            .prepare(
                "INSERT INTO service_records
                    (user_id, car_id, date, mileage, service_type, parts_cost, labor_cost, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id, car_id, date, mileage, service_type, parts_cost, labor_cost, notes",
            )?
            .query_row(
                (
                    user,
                    new_record.car_id,
                    new_record.date,
                    new_record.mileage,
                    &new_record.service_type,
                    new_record.parts_cost,
                    new_record.labor_cost,
                    &new_record.notes,
                ),
                map_row,
            )?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        models::{NewCar, NewServiceRecord},
        stores::{CarStore, ServiceRecordStore, sqlite::get_test_store},
    };

    #[test]
    fn created_record_round_trips_through_list() {
        let store = get_test_store();
        let car = store
            .create_car(
                1,
                NewCar {
                    make: "Tesla".to_owned(),
                    model: "Model Y".to_owned(),
                    year: 2023,
                    vin: None,
                    license_plate: None,
                    photo_url: None,
                },
            )
            .unwrap();

        let record = store
            .create_service_record(
                1,
                NewServiceRecord {
                    car_id: car.id,
                    date: date!(2023 - 09 - 15),
                    mileage: 1000,
                    service_type: "Tire Rotation".to_owned(),
                    parts_cost: 0.0,
                    labor_cost: 50.0,
                    notes: "Standard rotation.".to_owned(),
                },
            )
            .unwrap();

        assert_eq!(store.service_records(1).unwrap(), vec![record]);
        assert_eq!(store.service_records(2).unwrap(), vec![]);
    }
}
