//! Lifelog Status Tool
//!
//! Runtime status of the service, plus the usage guide served to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for AI assistants driving the tracker
pub const LIFELOG_INSTRUCTIONS: &str = r#"
# Lifelog Instructions

Lifelog tracks one signed-in user's habits, meals, expenses, burned
calories and body weight. Every tool below except the account, food and
status tools needs a session.

## Account

1. `sign_up` with an email and a password of at least 6 characters. A new
   account is signed in straight away.
2. `log_in` on later sessions. The first login of an account creates the
   default habit list.
3. `log_out` clears everything held in memory and returns to the landing
   screen. `session` tells you who is signed in.

## Screens

`navigate` accepts `landing`, `habit_matrix`, `daily_log`, `weight_log`
and `history`. Any screen can be reached from any other. `current_view`
returns the screen, the selected month, the meal draft and the last notice.

## Habits

- `list_habit_matrix` shows the selected month: one row per habit with a
  flag per day, the current streak, and a badge once the streak reaches 3.
- `shift_month` with `delta: -1` or `delta: 1` moves the month.
- `toggle_habit_day` flips a day. Leave `date` out for today, otherwise
  pass `YYYY-MM-DD`.
- `add_habit`, `rename_habit`, `delete_habit` manage the list.

## Meals

Foods come from a fixed table; call `list_foods` to see the names. Grams
and milliliters are per 100 units, countable foods are per item.

1. `calculate_macros` with up to 5 `{name, quantity}` rows previews the
   totals. Unknown names and empty or zero quantities are skipped.
2. `save_meal` with `category` (breakfast, lunch, snacks, dinner), a
   `name`, and the rows. The meal is stamped with the current time.
   Missing category or name fails with "Missing info"; no usable rows
   fails with "Add food items".

Saved meals cannot be edited. Use `delete_meal` and save again.

## Other entries

- `add_expense` (name, amount, optional details), `delete_expense`
- `add_burned` (activity, calories), `delete_burned`
- `add_weight` (kg), `delete_weight`, `weight_log` for the latest, first
  and overall change plus the change of every entry

## Summaries and charts

- `today_summary`: intake macros, burned, net calories, habit percent and
  today's expense total
- `history`: one row per day that has meals or activity, newest first
- `render_consistency_chart` and `render_weight_chart` write PNG files and
  return their paths

## Reset

`reset_all_data` with `confirm: true` deletes every record of the user and
restores the default habits. It cannot be undone.
"#;

/// Status information
#[derive(Debug, Serialize)]
pub struct LifelogStatus {
    // Build info
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    // Storage
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub chart_dir: String,

    // Process info
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks runtime state for status reporting
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    chart_dir: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, chart_dir: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            chart_dir,
        }
    }

    pub fn get_status(&self) -> LifelogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LifelogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            chart_dir: self.chart_dir.display().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
