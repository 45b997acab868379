//! In-memory record snapshot
//!
//! Every successful write produces a `Change`; `TrackerState::apply` turns
//! the previous snapshot into the next one without touching storage.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::models::{BurnedActivity, Expense, Habit, Meal, WeightEntry};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerState {
    /// Creation order
    pub habits: Vec<Habit>,
    /// Newest first
    pub meals: Vec<Meal>,
    /// Newest first
    pub expenses: Vec<Expense>,
    /// Newest first
    pub burned: Vec<BurnedActivity>,
    /// Oldest first
    pub weights: Vec<WeightEntry>,
}

#[derive(Debug, Clone)]
pub enum Change {
    HabitAdded(Habit),
    HabitRenamed { id: i64, name: String },
    HabitDeleted(i64),
    HabitDayToggled { id: i64, date: NaiveDate, completed: bool },
    MealAdded(Meal),
    MealDeleted(i64),
    ExpenseAdded(Expense),
    ExpenseDeleted(i64),
    BurnedAdded(BurnedActivity),
    BurnedDeleted(i64),
    WeightAdded(WeightEntry),
    WeightDeleted(i64),
    /// Everything removed; only the reseeded habits remain
    Reset { habits: Vec<Habit> },
}

/// Chronological order of two stored timestamps; falls back to text order
/// when either does not parse
fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

impl TrackerState {
    /// Build a snapshot from unordered store listings
    pub fn from_records(
        habits: Vec<Habit>,
        meals: Vec<Meal>,
        expenses: Vec<Expense>,
        burned: Vec<BurnedActivity>,
        weights: Vec<WeightEntry>,
    ) -> Self {
        let mut state = Self {
            habits,
            meals,
            expenses,
            burned,
            weights,
        };
        state.sort();
        state
    }

    fn sort(&mut self) {
        self.habits.sort_by_key(|h| h.id);
        self.meals
            .sort_by(|a, b| compare_timestamps(&b.date, &a.date).then(b.id.cmp(&a.id)));
        self.expenses
            .sort_by(|a, b| compare_timestamps(&b.date, &a.date).then(b.id.cmp(&a.id)));
        self.burned
            .sort_by(|a, b| compare_timestamps(&b.date, &a.date).then(b.id.cmp(&a.id)));
        self.weights
            .sort_by(|a, b| compare_timestamps(&a.date, &b.date).then(a.id.cmp(&b.id)));
    }

    pub fn habit(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
            && self.meals.is_empty()
            && self.expenses.is_empty()
            && self.burned.is_empty()
            && self.weights.is_empty()
    }

    /// Next snapshot after `change`
    pub fn apply(mut self, change: Change) -> Self {
        match change {
            Change::HabitAdded(habit) => self.habits.push(habit),
            Change::HabitRenamed { id, name } => {
                if let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) {
                    habit.name = name;
                }
            }
            Change::HabitDeleted(id) => self.habits.retain(|h| h.id != id),
            Change::HabitDayToggled {
                id,
                date,
                completed,
            } => {
                if let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) {
                    if completed {
                        habit.completed_dates.insert(date);
                    } else {
                        habit.completed_dates.remove(&date);
                    }
                }
            }
            Change::MealAdded(meal) => self.meals.push(meal),
            Change::MealDeleted(id) => self.meals.retain(|m| m.id != id),
            Change::ExpenseAdded(expense) => self.expenses.push(expense),
            Change::ExpenseDeleted(id) => self.expenses.retain(|e| e.id != id),
            Change::BurnedAdded(activity) => self.burned.push(activity),
            Change::BurnedDeleted(id) => self.burned.retain(|b| b.id != id),
            Change::WeightAdded(entry) => self.weights.push(entry),
            Change::WeightDeleted(id) => self.weights.retain(|w| w.id != id),
            Change::Reset { habits } => {
                self = Self {
                    habits,
                    ..Self::default()
                };
            }
        }
        self.sort();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealCategory, Macros};

    fn expense(id: i64, date: &str) -> Expense {
        Expense {
            id,
            user_id: 1,
            date: date.to_string(),
            name: format!("Expense {}", id),
            amount: 1.0,
            details: String::new(),
        }
    }

    fn weight(id: i64, date: &str, kg: f64) -> WeightEntry {
        WeightEntry {
            id,
            user_id: 1,
            date: date.to_string(),
            weight: kg,
        }
    }

    fn habit(id: i64) -> Habit {
        Habit {
            id,
            user_id: 1,
            name: format!("Habit {}", id),
            completed_dates: Default::default(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_from_records_orders_each_kind() {
        let state = TrackerState::from_records(
            vec![habit(2), habit(1)],
            Vec::new(),
            vec![
                expense(1, "2025-03-01T09:00:00.000+00:00"),
                expense(2, "2025-03-03T09:00:00.000+00:00"),
                expense(3, "2025-03-02T09:00:00.000+00:00"),
            ],
            Vec::new(),
            vec![
                weight(1, "2025-03-03T07:00:00.000+00:00", 80.0),
                weight(2, "2025-03-01T07:00:00.000+00:00", 81.0),
            ],
        );
        assert_eq!(state.habits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.expenses.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3, 1]);
        assert_eq!(state.weights.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_timestamps_compare_across_offsets() {
        // 09:00 at +05:30 is earlier than 08:00 UTC
        assert_eq!(
            compare_timestamps("2025-03-01T09:00:00.000+05:30", "2025-03-01T08:00:00.000+00:00"),
            Ordering::Less
        );
    }

    #[test]
    fn test_apply_adds_in_sorted_position() {
        let state = TrackerState::default()
            .apply(Change::WeightAdded(weight(1, "2025-03-02T07:00:00.000+00:00", 80.0)))
            .apply(Change::WeightAdded(weight(2, "2025-03-01T07:00:00.000+00:00", 81.0)))
            .apply(Change::ExpenseAdded(expense(1, "2025-03-01T09:00:00.000+00:00")))
            .apply(Change::ExpenseAdded(expense(2, "2025-03-02T09:00:00.000+00:00")));

        assert_eq!(state.weights[0].id, 2);
        assert_eq!(state.expenses[0].id, 2);
    }

    #[test]
    fn test_apply_toggle_and_rename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let state = TrackerState::default()
            .apply(Change::HabitAdded(habit(1)))
            .apply(Change::HabitDayToggled { id: 1, date, completed: true })
            .apply(Change::HabitRenamed { id: 1, name: "Read".into() });
        assert!(state.habits[0].is_completed_on(date));
        assert_eq!(state.habits[0].name, "Read");

        let state = state.apply(Change::HabitDayToggled { id: 1, date, completed: false });
        assert!(!state.habits[0].is_completed_on(date));

        // Unknown ids leave the snapshot as it was
        let before = state.clone();
        assert_eq!(state.apply(Change::HabitRenamed { id: 9, name: "x".into() }), before);
    }

    #[test]
    fn test_apply_deletes_and_reset() {
        let meal = Meal {
            id: 5,
            user_id: 1,
            date: "2025-03-01T12:00:00.000+00:00".into(),
            category: MealCategory::Lunch,
            name: "Lunch".into(),
            items: Vec::new(),
            total_macros: Macros::zero(),
        };
        let state = TrackerState::default()
            .apply(Change::MealAdded(meal))
            .apply(Change::HabitAdded(habit(1)));
        let state = state.apply(Change::MealDeleted(5));
        assert!(state.meals.is_empty());

        let state = state
            .apply(Change::ExpenseAdded(expense(1, "2025-03-01T09:00:00.000+00:00")))
            .apply(Change::Reset { habits: vec![habit(7)] });
        assert!(state.expenses.is_empty());
        assert_eq!(state.habits.len(), 1);
        assert_eq!(state.habits[0].id, 7);
    }
}
