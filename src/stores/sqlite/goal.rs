//! Implements the SQLite backed savings goal store.

use rusqlite::Row;

use crate::{
    Error, UserId,
    models::{Goal, GoalId, NewGoal},
    stores::{GoalStore, sqlite::SQLiteStore},
};

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        end_date: row.get(4)?,
    })
}

impl GoalStore for SQLiteStore {
    fn goals(&self, user: UserId) -> Result<Vec<Goal>, Error> {
        let connection = self.connection();

        let goals = connection
            .prepare(
                "SELECT id, name, target_amount, current_amount, end_date
                 FROM goals WHERE user_id = ?1",
            )?
            .query_map([user], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    fn create_goal(&self, user: UserId, new_goal: NewGoal) -> Result<Goal, Error> {
        let connection = self.connection();

        // current_amount is left to its database default of zero.
        let goal = connection
            .prepare(
                "INSERT INTO goals (user_id, name, target_amount, end_date)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, target_amount, current_amount, end_date",
            )?
            .query_row(
                (
                    user,
                    &new_goal.name,
                    new_goal.target_amount,
                    new_goal.end_date,
                ),
                map_row,
            )?;

        Ok(goal)
    }

    fn delete_goal(&self, user: UserId, id: GoalId) -> Result<(), Error> {
        let connection = self.connection();

        let deleted = connection.execute(
            "DELETE FROM goals WHERE id = ?1 AND user_id = ?2",
            (id, user),
        )?;

        if deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
