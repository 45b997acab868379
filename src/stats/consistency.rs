//! Habit consistency
//!
//! Streaks for single habits, per-day completion counts for a month, and the
//! habit matrix the grid screen shows.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{date_key, YearMonth};
use crate::models::Habit;

/// Streaks of at least this many days get a badge
pub const STREAK_BADGE_MIN: u32 = 3;

/// Consecutive completed days ending today; 0 if today is not completed
pub fn streak(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = today;
    while completed.contains(&day) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

pub fn has_streak_badge(streak: u32) -> bool {
    streak >= STREAK_BADGE_MIN
}

/// Habits completed on each day of the month; one entry per day
pub fn monthly_counts(habits: &[Habit], month: YearMonth) -> Vec<u32> {
    month
        .dates()
        .into_iter()
        .map(|date| habits.iter().filter(|h| h.is_completed_on(date)).count() as u32)
        .collect()
}

/// Fraction of all habits completed per day. `None` when there are no
/// habits, since a ratio over zero habits has no meaning.
pub fn completion_ratios(counts: &[u32], habit_count: usize) -> Option<Vec<f64>> {
    if habit_count == 0 {
        return None;
    }
    Some(
        counts
            .iter()
            .map(|&c| c as f64 / habit_count as f64)
            .collect(),
    )
}

// ============================================================================
// Habit Matrix
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HabitRow {
    pub id: i64,
    pub name: String,
    /// Completion flag per day of the month, index 0 is day 1
    pub days: Vec<bool>,
    pub completed_this_month: u32,
    pub streak: u32,
    pub streak_badge: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitMatrix {
    pub month: YearMonth,
    pub label: String,
    pub days_in_month: u32,
    /// Day of month for today, when today falls in the shown month
    pub today: Option<u32>,
    pub today_key: String,
    pub rows: Vec<HabitRow>,
    pub daily_counts: Vec<u32>,
    pub daily_ratios: Option<Vec<f64>>,
}

pub fn habit_matrix(habits: &[Habit], month: YearMonth, today: NaiveDate) -> HabitMatrix {
    let dates = month.dates();

    let rows = habits
        .iter()
        .map(|habit| {
            let days: Vec<bool> = dates.iter().map(|d| habit.is_completed_on(*d)).collect();
            let streak = streak(&habit.completed_dates, today);
            HabitRow {
                id: habit.id,
                name: habit.name.clone(),
                completed_this_month: days.iter().filter(|&&done| done).count() as u32,
                days,
                streak,
                streak_badge: has_streak_badge(streak),
            }
        })
        .collect();

    let daily_counts = monthly_counts(habits, month);
    let daily_ratios = completion_ratios(&daily_counts, habits.len());

    HabitMatrix {
        month,
        label: month.label(),
        days_in_month: month.days(),
        today: (YearMonth::of(today) == month).then(|| today.day()),
        today_key: date_key(today),
        rows,
        daily_counts,
        daily_ratios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn habit(id: i64, dates: &[NaiveDate]) -> Habit {
        Habit {
            id,
            user_id: 1,
            name: format!("Habit {}", id),
            completed_dates: dates.iter().copied().collect(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_streak_counts_back_from_today() {
        let today = d(2025, 3, 10);
        let dates: BTreeSet<_> = [d(2025, 3, 10), d(2025, 3, 9), d(2025, 3, 8), d(2025, 3, 6)]
            .into_iter()
            .collect();
        assert_eq!(streak(&dates, today), 3);
    }

    #[test]
    fn test_streak_is_zero_without_today() {
        let today = d(2025, 3, 10);
        let dates: BTreeSet<_> = [d(2025, 3, 9), d(2025, 3, 8)].into_iter().collect();
        assert_eq!(streak(&dates, today), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = d(2025, 3, 1);
        let dates: BTreeSet<_> = [d(2025, 3, 1), d(2025, 2, 28)].into_iter().collect();
        assert_eq!(streak(&dates, today), 2);
    }

    #[test]
    fn test_badge_threshold() {
        assert!(!has_streak_badge(2));
        assert!(has_streak_badge(3));
    }

    #[test]
    fn test_monthly_counts_length_matches_month() {
        let habits = vec![habit(1, &[d(2024, 2, 29)]), habit(2, &[d(2024, 2, 29), d(2024, 2, 1)])];
        let counts = monthly_counts(&habits, YearMonth::new(2024, 2).unwrap());
        assert_eq!(counts.len(), 29);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[28], 2);

        assert_eq!(monthly_counts(&[], YearMonth::new(2025, 4).unwrap()).len(), 30);
        assert_eq!(monthly_counts(&[], YearMonth::new(2025, 2).unwrap()).len(), 28);
    }

    #[test]
    fn test_ratios_undefined_without_habits() {
        let counts = monthly_counts(&[], YearMonth::new(2025, 1).unwrap());
        assert!(counts.iter().all(|&c| c == 0));
        assert!(completion_ratios(&counts, 0).is_none());
    }

    #[test]
    fn test_ratios_stay_in_unit_range() {
        let ratios = completion_ratios(&[0, 2, 4], 4).unwrap();
        assert_eq!(ratios, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_matrix_marks_today_only_in_its_month() {
        let today = d(2025, 3, 10);
        let habits = vec![habit(1, &[d(2025, 3, 8), d(2025, 3, 9), d(2025, 3, 10)])];

        let matrix = habit_matrix(&habits, YearMonth::of(today), today);
        assert_eq!(matrix.today, Some(10));
        assert_eq!(matrix.rows[0].streak, 3);
        assert!(matrix.rows[0].streak_badge);
        assert_eq!(matrix.rows[0].completed_this_month, 3);
        assert!(matrix.rows[0].days[9]);

        let previous = habit_matrix(&habits, YearMonth::of(today).shift(-1).unwrap(), today);
        assert_eq!(previous.today, None);
        assert_eq!(previous.days_in_month, 28);
        assert_eq!(previous.rows[0].completed_this_month, 0);
    }
}
