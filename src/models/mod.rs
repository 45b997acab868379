//! Data models
//!
//! Rust structs representing database entities. Every record belongs to one
//! user and every query is scoped by that user's id.

mod burned;
mod expense;
mod habit;
mod macros;
mod meal;
mod reset;
mod user;
mod weight;

pub use burned::{BurnedActivity, BurnedActivityCreate, BurnedActivityUpdate};
pub use expense::{Expense, ExpenseCreate, ExpenseUpdate};
pub use habit::{Habit, HabitCreate, HabitUpdate, DEFAULT_HABITS};
pub use macros::Macros;
pub use meal::{Meal, MealCategory, MealCreate, MealItem};
pub use reset::{reset_user_data, ResetSummary};
pub use user::User;
pub use weight::{WeightEntry, WeightEntryCreate, WeightEntryUpdate};
