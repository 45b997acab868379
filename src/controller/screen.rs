//! Screens the tracker can show

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Landing,
    HabitMatrix,
    DailyLog,
    WeightLog,
    History,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Landing => "landing",
            Screen::HabitMatrix => "habit_matrix",
            Screen::DailyLog => "daily_log",
            Screen::WeightLog => "weight_log",
            Screen::History => "history",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "landing" | "home" => Some(Screen::Landing),
            "habit_matrix" | "habits" => Some(Screen::HabitMatrix),
            "daily_log" | "meals" | "log" => Some(Screen::DailyLog),
            "weight_log" | "weight" => Some(Screen::WeightLog),
            "history" | "stats" => Some(Screen::History),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => "Home",
            Screen::HabitMatrix => "Habit Matrix",
            Screen::DailyLog => "Daily Log",
            Screen::WeightLog => "Weight",
            Screen::History => "History",
        }
    }

    pub fn all() -> [Screen; 5] {
        [
            Screen::Landing,
            Screen::HabitMatrix,
            Screen::DailyLog,
            Screen::WeightLog,
            Screen::History,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        for screen in Screen::all() {
            assert_eq!(Screen::from_str(screen.as_str()), Some(screen));
        }
        assert_eq!(Screen::from_str("Habit-Matrix"), Some(Screen::HabitMatrix));
        assert_eq!(Screen::from_str("stats"), Some(Screen::History));
        assert_eq!(Screen::from_str("settings"), None);
    }
}
