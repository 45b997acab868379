//! Bulk reset
//!
//! Deletes every record of every kind for one user and reseeds the default
//! habit list, all inside a single transaction.

use serde::Serialize;

use crate::db::{Database, DbResult};

use super::{BurnedActivity, Expense, Habit, Meal, WeightEntry};

/// Rows removed by a reset, plus the habits it reseeded
#[derive(Debug, Clone, Serialize)]
pub struct ResetSummary {
    pub habits_deleted: usize,
    pub meals_deleted: usize,
    pub expenses_deleted: usize,
    pub burned_deleted: usize,
    pub weights_deleted: usize,
    pub habits: Vec<Habit>,
}

impl ResetSummary {
    pub fn total_deleted(&self) -> usize {
        self.habits_deleted
            + self.meals_deleted
            + self.expenses_deleted
            + self.burned_deleted
            + self.weights_deleted
    }
}

/// All-or-nothing: on any error nothing is deleted
pub fn reset_user_data(db: &Database, user_id: i64) -> DbResult<ResetSummary> {
    db.with_transaction(|tx| {
        let habits_deleted = Habit::delete_all_for_user(tx, user_id)?;
        let meals_deleted = Meal::delete_all_for_user(tx, user_id)?;
        let expenses_deleted = Expense::delete_all_for_user(tx, user_id)?;
        let burned_deleted = BurnedActivity::delete_all_for_user(tx, user_id)?;
        let weights_deleted = WeightEntry::delete_all_for_user(tx, user_id)?;
        let habits = Habit::seed_defaults(tx, user_id)?;

        Ok(ResetSummary {
            habits_deleted,
            meals_deleted,
            expenses_deleted,
            burned_deleted,
            weights_deleted,
            habits,
        })
    })
}
