//! Daily aggregation
//!
//! Groups meals, burned activities and habit completions by calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{date_key, day_key_of, parse_date_key};
use crate::models::{BurnedActivity, Expense, Habit, Macros, Meal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DaySummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub burned: f64,
    pub habit_percent: u32,
}

/// One row of the history table
#[derive(Debug, Clone, Serialize)]
pub struct DayRow {
    pub date: String,
    #[serde(flatten)]
    pub summary: DaySummary,
}

/// Rounded percentage of habits done; 0 when there are no habits
pub fn habit_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as u32
}

fn habits_done_on(habits: &[Habit], day: &str) -> usize {
    match parse_date_key(day) {
        Some(date) => habits.iter().filter(|h| h.is_completed_on(date)).count(),
        None => 0,
    }
}

/// Per-day summaries keyed by date-key.
///
/// A day appears when it has at least one meal or burned activity; habit
/// completions alone do not create a row.
pub fn aggregate_days(
    meals: &[Meal],
    burned: &[BurnedActivity],
    habits: &[Habit],
) -> BTreeMap<String, DaySummary> {
    let mut days: BTreeMap<String, DaySummary> = BTreeMap::new();

    for meal in meals {
        let Some(key) = day_key_of(&meal.date) else { continue };
        let day = days.entry(key.to_string()).or_default();
        day.calories += meal.total_macros.calories;
        day.protein += meal.total_macros.protein;
        day.carbs += meal.total_macros.carbs;
        day.fats += meal.total_macros.fats;
    }

    for activity in burned {
        let Some(key) = day_key_of(&activity.date) else { continue };
        days.entry(key.to_string()).or_default().burned += activity.calories;
    }

    for (key, day) in days.iter_mut() {
        day.habit_percent = habit_percent(habits_done_on(habits, key), habits.len());
    }

    days
}

/// History view: newest day first
pub fn history(days: &BTreeMap<String, DaySummary>) -> Vec<DayRow> {
    days.iter()
        .rev()
        .map(|(date, summary)| DayRow {
            date: date.clone(),
            summary: *summary,
        })
        .collect()
}

// ============================================================================
// Today
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TodayView {
    pub date: String,
    #[serde(flatten)]
    pub summary: DaySummary,
    /// Intake minus burned
    pub net_calories: f64,
    pub expenses_total: f64,
    pub meal_count: usize,
    pub expense_count: usize,
    pub activity_count: usize,
}

pub fn today_view(
    today: NaiveDate,
    meals: &[Meal],
    burned: &[BurnedActivity],
    expenses: &[Expense],
    habits: &[Habit],
) -> TodayView {
    let key = date_key(today);
    let on_today = |date: &str| day_key_of(date) == Some(key.as_str());

    let todays_meals: Vec<Meal> = meals.iter().filter(|m| on_today(&m.date)).cloned().collect();
    let todays_burned: Vec<BurnedActivity> =
        burned.iter().filter(|b| on_today(&b.date)).cloned().collect();
    let todays_expenses: Vec<&Expense> = expenses.iter().filter(|e| on_today(&e.date)).collect();

    let mut summary = aggregate_days(&todays_meals, &todays_burned, habits)
        .remove(&key)
        .unwrap_or_default();
    summary.habit_percent = habit_percent(habits_done_on(habits, &key), habits.len());

    TodayView {
        date: key,
        net_calories: summary.calories - summary.burned,
        expenses_total: todays_expenses.iter().map(|e| e.amount).sum(),
        meal_count: todays_meals.len(),
        expense_count: todays_expenses.len(),
        activity_count: todays_burned.len(),
        summary,
    }
}
