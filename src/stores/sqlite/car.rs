//! Implements the SQLite backed car store.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{Car, NewCar},
    stores::{CarStore, sqlite::SQLiteStore},
};

fn map_row(row: &Row) -> Result<Car, rusqlite::Error> {
    Ok(Car {
        id: row.get(0)?,
        make: row.get(1)?,
        model: row.get(2)?,
        year: row.get(3)?,
        vin: row.get(4)?,
        license_plate: row.get(5)?,
        photo_url: row.get(6)?,
    })
}

impl CarStore for SQLiteStore {
    fn cars(&self, user: UserId) -> Result<Vec<Car>, Error> {
        let connection = self.connection();

        let cars = connection
            .prepare(
                "SELECT id, make, model, year, vin, license_plate, photo_url
                 FROM cars WHERE user_id = ?1",
            )?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cars)
    }

    fn create_car(&self, user: UserId, new_car: NewCar) -> Result<Car, Error> {
        let connection = self.connection();

        let car = connection
            .prepare(
                "INSERT INTO cars (user_id, make, model, year, vin, license_plate, photo_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, make, model, year, vin, license_plate, photo_url",
            )?
            .query_row(
                (
                    user,
                    &new_car.make,
                    &new_car.model,
                    new_car.year,
                    &new_car.vin,
                    &new_car.license_plate,
                    &new_car.photo_url,
                ),
                map_row,
            )?;

        Ok(car)
    }
}
