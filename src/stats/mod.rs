//! Stats module
//!
//! Pure computations over loaded records: habit consistency, per-day
//! summaries, and weight progress.

pub mod consistency;
pub mod daily;
pub mod weight;

pub use consistency::{
    completion_ratios, habit_matrix, has_streak_badge, monthly_counts, streak, HabitMatrix,
    HabitRow, STREAK_BADGE_MIN,
};
pub use daily::{aggregate_days, habit_percent, history, today_view, DayRow, DaySummary, TodayView};
pub use weight::{weight_rows, weight_summary, WeightRow, WeightSummary};
