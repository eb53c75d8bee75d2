//! Defines the savings goal store trait.

use crate::{
    Error, UserId,
    models::{Goal, GoalId, NewGoal},
};

/// Handles the creation, retrieval and deletion of savings goals.
///
/// Goals are the only collection that supports deletion.
pub trait GoalStore: Send + Sync {
    /// Retrieve all of `user`'s goals in storage order.
    fn goals(&self, user: UserId) -> Result<Vec<Goal>, Error>;

    /// Create a new goal for `user`.
    ///
    /// The goal's current amount starts at zero.
    fn create_goal(&self, user: UserId, new_goal: NewGoal) -> Result<Goal, Error>;

    /// Delete one of `user`'s goals.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the goal does not exist or belongs to
    /// another user.
    fn delete_goal(&self, user: UserId, id: GoalId) -> Result<(), Error>;
}
