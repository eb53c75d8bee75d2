//! Implements the SQLite backed refueling store.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{NewRefueling, Refueling},
    stores::{RefuelingStore, sqlite::SQLiteStore},
};

fn map_row(row: &Row) -> Result<Refueling, rusqlite::Error> {
    Ok(Refueling {
        id: row.get(0)?,
        car_id: row.get(1)?,
        date: row.get(2)?,
        mileage: row.get(3)?,
        liters: row.get(4)?,
        price_per_liter: row.get(5)?,
    })
}

impl RefuelingStore for SQLiteStore {
    fn refuelings(&self, user: UserId) -> Result<Vec<Refueling>, Error> {
        let connection = self.connection();

        let refuelings = connection
            .prepare(
                "SELECT id, car_id, date, mileage, liters, price_per_liter
                 FROM refuelings WHERE user_id = ?1",
            )?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(refuelings)
    }

    fn create_refueling(
        &self,
        user: UserId,
        new_refueling: NewRefueling,
    ) -> Result<Refueling, Error> {
        let connection = self.connection();

        let refueling = connection
            .prepare(
                "INSERT INTO refuelings (user_id, car_id, date, mileage, liters, price_per_liter)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, car_id, date, mileage, liters, price_per_liter",
            )?
            .query_row(
                (
                    user,
                    new_refueling.car_id,
                    new_refueling.date,
                    new_refueling.mileage,
                    new_refueling.liters,
                    new_refueling.price_per_liter,
                ),
                map_row,
            )?;

        Ok(refueling)
    }
}
