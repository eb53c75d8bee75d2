use serde::{Deserialize, Serialize};
use time::Date;

/// Alias for the integer type used to identify savings goals.
pub type GoalId = i64;

/// A savings goal with a target amount and optional deadline.
///
/// `current_amount` is set to zero by the database on creation and no
/// operation modifies it afterwards; progress tracking is manual for now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The id for the goal.
    pub id: GoalId,
    /// The display name of the goal.
    pub name: String,
    /// The amount of money to save.
    pub target_amount: f64,
    /// How much has been saved so far.
    pub current_amount: f64,
    /// The date the goal should be reached by, if any.
    #[serde(default, with = "super::iso_date::option")]
    pub end_date: Option<Date>,
}

/// The data needed to create a new [Goal].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// The display name of the goal.
    pub name: String,
    /// The amount of money to save.
    pub target_amount: f64,
    /// The date the goal should be reached by, if any.
    #[serde(default, with = "super::iso_date::option")]
    pub end_date: Option<Date>,
}
