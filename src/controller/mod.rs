//! View controller
//!
//! Owns the current screen, the selected month, the meal draft and the
//! record snapshot of the signed-in user. Each mutating action makes one
//! store call, then applies a `Change` to the snapshot and leaves a notice
//! describing the outcome. On failure the snapshot is left as it was.

mod draft;
mod screen;
mod state;

pub use draft::{MealDraft, MAX_FOOD_ROWS};
pub use screen::Screen;
pub use state::{Change, TrackerState};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthService, Session};
use crate::calendar::{format_timestamp, Clock, YearMonth};
use crate::charts::{self, ChartError, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::db::{Database, DbError};
use crate::models::{
    reset_user_data, BurnedActivity, BurnedActivityCreate, Expense, ExpenseCreate, Habit,
    HabitCreate, HabitUpdate, Meal, MealCategory, MealCreate, ResetSummary, WeightEntry,
    WeightEntryCreate,
};
use crate::nutrition::{FoodLine, MacroBreakdown};
use crate::stats::{
    self, DayRow, HabitMatrix, TodayView, WeightRow, WeightSummary,
};

/// Why a user action did not go through
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),

    #[error("Please log in first")]
    NotSignedIn,

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{0}")]
    Storage(#[from] DbError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Chart(#[from] ChartError),
}

fn missing_info() -> ActionError {
    ActionError::Validation("Missing info".to_string())
}

fn required(value: &str) -> Result<&str, ActionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing_info());
    }
    Ok(trimmed)
}

/// A present, finite, positive number
fn positive(value: Option<f64>, label: &str) -> Result<f64, ActionError> {
    let value = value.ok_or_else(missing_info)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ActionError::Validation(format!("Enter a valid {}", label)));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient outcome message of the last action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub screen: Screen,
    pub title: &'static str,
    pub month: YearMonth,
    pub month_label: String,
    pub session: Option<Session>,
    pub draft: MealDraft,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightLogView {
    pub summary: Option<WeightSummary>,
    pub entries: usize,
    pub rows: Vec<WeightRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub today: TodayView,
    pub days: Vec<DayRow>,
    pub meals: Vec<Meal>,
    pub burned: Vec<BurnedActivity>,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartFile {
    pub path: PathBuf,
    pub points: usize,
}

// ============================================================================
// Controller
// ============================================================================

pub struct Controller {
    database: Database,
    auth: AuthService,
    session_rx: watch::Receiver<Option<Session>>,
    session: Option<Session>,
    clock: Arc<dyn Clock>,
    screen: Screen,
    month: YearMonth,
    draft: MealDraft,
    state: TrackerState,
    notice: Option<Notice>,
}

impl Controller {
    pub fn new(database: Database, clock: Arc<dyn Clock>) -> Self {
        let auth = AuthService::new(database.clone());
        let session_rx = auth.subscribe();
        let month = YearMonth::of(clock.today());
        Self {
            database,
            auth,
            session_rx,
            session: None,
            clock,
            screen: Screen::Landing,
            month,
            draft: MealDraft::default(),
            state: TrackerState::default(),
            notice: None,
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn draft(&self) -> &MealDraft {
        &self.draft
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            screen: self.screen,
            title: self.screen.title(),
            month: self.month,
            month_label: self.month.label(),
            session: self.session.clone(),
            draft: self.draft.clone(),
            notice: self.notice.clone(),
        }
    }

    /// Follow the auth stream: load records for a new session, clear them
    /// when the session ends
    fn sync_session(&mut self) -> Result<Option<Session>, ActionError> {
        let current = self.session_rx.borrow_and_update().clone();
        match current {
            None => {
                if self.session.is_some() {
                    self.clear();
                }
                Ok(None)
            }
            Some(session) => {
                if self.session.as_ref() != Some(&session) {
                    self.load(&session)?;
                }
                Ok(Some(session))
            }
        }
    }

    fn require_session(&mut self) -> Result<i64, ActionError> {
        self.sync_session()?
            .map(|s| s.user_id)
            .ok_or(ActionError::NotSignedIn)
    }

    fn load(&mut self, session: &Session) -> Result<(), ActionError> {
        let user_id = session.user_id;
        let state = self.database.with_conn(|conn| {
            let mut habits = Habit::list_for_user(conn, user_id)?;
            if habits.is_empty() {
                habits = Habit::seed_defaults(conn, user_id)?;
                info!(user_id, count = habits.len(), "seeded default habits");
            }
            Ok(TrackerState::from_records(
                habits,
                Meal::list_for_user(conn, user_id)?,
                Expense::list_for_user(conn, user_id)?,
                BurnedActivity::list_for_user(conn, user_id)?,
                WeightEntry::list_for_user(conn, user_id)?,
            ))
        });

        match state {
            Ok(state) => {
                info!(user_id, "loaded user data");
                self.state = state;
                self.session = Some(session.clone());
                self.month = YearMonth::of(self.clock.today());
                Ok(())
            }
            Err(e) => {
                warn!(user_id, error = %e, "error loading user data");
                self.state = TrackerState::default();
                self.session = None;
                Err(e.into())
            }
        }
    }

    fn clear(&mut self) {
        self.session = None;
        self.state = TrackerState::default();
        self.draft.clear();
        self.screen = Screen::Landing;
    }

    fn commit(&mut self, change: Change) {
        let previous = std::mem::take(&mut self.state);
        self.state = previous.apply(change);
    }

    /// Run an action and record its notice
    fn act<T>(
        &mut self,
        success: Option<&str>,
        f: impl FnOnce(&mut Self) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let result = f(self);
        match &result {
            Ok(_) => {
                if let Some(message) = success {
                    self.notice = Some(Notice::success(message));
                }
            }
            Err(e) => {
                warn!(error = %e, "action failed");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
        result
    }

    // --- Account ---

    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<Session, ActionError> {
        self.act(Some("Account created!"), |c| {
            let session = c.auth.sign_up(email, password)?;
            c.sync_session()?;
            Ok(session)
        })
    }

    pub fn log_in(&mut self, email: &str, password: &str) -> Result<Session, ActionError> {
        self.act(Some("Welcome back!"), |c| {
            let session = c.auth.log_in(email, password)?;
            c.sync_session()?;
            Ok(session)
        })
    }

    pub fn log_out(&mut self) {
        self.auth.log_out();
        self.session_rx.borrow_and_update();
        self.clear();
        self.notice = Some(Notice::success("Logged out successfully"));
    }

    pub fn session(&mut self) -> Option<Session> {
        self.sync_session().ok().flatten()
    }

    // --- Navigation ---

    pub fn navigate(&mut self, screen: Screen) -> Result<ViewState, ActionError> {
        self.act(None, |c| {
            if screen != Screen::Landing {
                c.require_session()?;
            }
            c.screen = screen;
            debug!(screen = screen.as_str(), "navigated");
            Ok(c.view())
        })
    }

    pub fn shift_month(&mut self, delta: i32) -> Result<HabitMatrix, ActionError> {
        self.act(None, |c| {
            c.require_session()?;
            c.month = c.month.shift(delta).ok_or_else(|| {
                ActionError::Validation(format!("Cannot move {} months from {}", delta, c.month.label()))
            })?;
            Ok(stats::habit_matrix(&c.state.habits, c.month, c.clock.today()))
        })
    }

    // --- Habits ---

    pub fn habit_matrix(&mut self) -> Result<HabitMatrix, ActionError> {
        self.act(None, |c| {
            c.require_session()?;
            Ok(stats::habit_matrix(&c.state.habits, c.month, c.clock.today()))
        })
    }

    pub fn add_habit(&mut self, name: &str) -> Result<Habit, ActionError> {
        self.act(Some("Habit added!"), |c| {
            let user_id = c.require_session()?;
            let name = required(name)?;
            let habit = c.database.with_conn(|conn| {
                Habit::create(
                    conn,
                    user_id,
                    &HabitCreate {
                        name: name.to_string(),
                        ..Default::default()
                    },
                )
            })?;
            debug!(user_id, habit_id = habit.id, "habit added");
            c.commit(Change::HabitAdded(habit.clone()));
            Ok(habit)
        })
    }

    pub fn rename_habit(&mut self, id: i64, name: &str) -> Result<Habit, ActionError> {
        self.act(Some("Habit renamed"), |c| {
            let user_id = c.require_session()?;
            let name = required(name)?;
            let habit = c
                .database
                .with_conn(|conn| {
                    Habit::update(
                        conn,
                        user_id,
                        id,
                        &HabitUpdate {
                            name: Some(name.to_string()),
                            ..Default::default()
                        },
                    )
                })?
                .ok_or(ActionError::NotFound { kind: "Habit", id })?;
            debug!(user_id, habit_id = id, "habit renamed");
            c.commit(Change::HabitRenamed {
                id,
                name: habit.name.clone(),
            });
            Ok(habit)
        })
    }

    pub fn delete_habit(&mut self, id: i64) -> Result<(), ActionError> {
        self.act(Some("Habit deleted"), |c| {
            let user_id = c.require_session()?;
            if !c.database.with_conn(|conn| Habit::delete(conn, user_id, id))? {
                return Err(ActionError::NotFound { kind: "Habit", id });
            }
            debug!(user_id, habit_id = id, "habit deleted");
            c.commit(Change::HabitDeleted(id));
            Ok(())
        })
    }

    /// Flip one day of a habit; defaults to today. Returns the new state.
    pub fn toggle_habit_day(&mut self, id: i64, date: Option<NaiveDate>) -> Result<bool, ActionError> {
        self.act(Some("Habit updated"), |c| {
            let user_id = c.require_session()?;
            let date = date.unwrap_or_else(|| c.clock.today());
            let completed = !c
                .state
                .habit(id)
                .ok_or(ActionError::NotFound { kind: "Habit", id })?
                .is_completed_on(date);

            if !c
                .database
                .with_conn(|conn| Habit::set_completed(conn, user_id, id, date, completed))?
            {
                return Err(ActionError::NotFound { kind: "Habit", id });
            }
            debug!(user_id, habit_id = id, %date, completed, "habit day toggled");
            c.commit(Change::HabitDayToggled { id, date, completed });
            Ok(completed)
        })
    }

    // --- Meals ---

    /// Update the meal form. `None` fields keep their current value; on
    /// error no field changes.
    pub fn edit_draft(
        &mut self,
        category: Option<&str>,
        name: Option<&str>,
        rows: Option<Vec<FoodLine>>,
    ) -> Result<MealDraft, ActionError> {
        self.act(None, |c| {
            let mut draft = c.draft.clone();
            if let Some(rows) = rows {
                draft.set_rows(rows).map_err(ActionError::Validation)?;
            }
            if let Some(category) = category {
                draft.category = Some(MealCategory::from_str(category).ok_or_else(|| {
                    ActionError::Validation(format!("Unknown meal category: {}", category))
                })?);
            }
            if let Some(name) = name {
                draft.name = name.trim().to_string();
            }
            c.draft = draft;
            Ok(c.draft.clone())
        })
    }

    pub fn add_food_row(&mut self) -> bool {
        self.draft.add_row()
    }

    pub fn remove_food_row(&mut self) -> bool {
        self.draft.remove_row()
    }

    pub fn calculate_macros(&self) -> MacroBreakdown {
        self.draft.breakdown()
    }

    /// Save the current draft as a meal and reset the form
    pub fn save_meal(&mut self) -> Result<Meal, ActionError> {
        self.act(Some("Meal saved!"), |c| {
            let user_id = c.require_session()?;
            let category = c.draft.category.ok_or_else(missing_info)?;
            let name = required(&c.draft.name)?.to_string();
            let breakdown = c.draft.breakdown();
            if breakdown.is_empty() {
                return Err(ActionError::Validation("Add food items".to_string()));
            }

            let data = MealCreate::from_breakdown(
                format_timestamp(&c.clock.now()),
                category,
                name,
                &breakdown,
            );
            let meal = c.database.with_conn(|conn| Meal::create(conn, user_id, &data))?;
            debug!(user_id, meal_id = meal.id, items = meal.items.len(), "meal saved");
            c.commit(Change::MealAdded(meal.clone()));
            c.draft.clear();
            Ok(meal)
        })
    }

    pub fn delete_meal(&mut self, id: i64) -> Result<(), ActionError> {
        self.act(Some("Meal deleted"), |c| {
            let user_id = c.require_session()?;
            if !c.database.with_conn(|conn| Meal::delete(conn, user_id, id))? {
                return Err(ActionError::NotFound { kind: "Meal", id });
            }
            debug!(user_id, meal_id = id, "meal deleted");
            c.commit(Change::MealDeleted(id));
            Ok(())
        })
    }

    // --- Expenses, activity, weight ---

    pub fn add_expense(
        &mut self,
        name: &str,
        amount: Option<f64>,
        details: &str,
    ) -> Result<Expense, ActionError> {
        self.act(Some("Expense added"), |c| {
            let user_id = c.require_session()?;
            let data = ExpenseCreate {
                date: format_timestamp(&c.clock.now()),
                name: required(name)?.to_string(),
                amount: positive(amount, "amount")?,
                details: details.trim().to_string(),
            };
            let expense = c.database.with_conn(|conn| Expense::create(conn, user_id, &data))?;
            debug!(user_id, expense_id = expense.id, "expense added");
            c.commit(Change::ExpenseAdded(expense.clone()));
            Ok(expense)
        })
    }

    pub fn delete_expense(&mut self, id: i64) -> Result<(), ActionError> {
        self.act(Some("Expense deleted"), |c| {
            let user_id = c.require_session()?;
            if !c.database.with_conn(|conn| Expense::delete(conn, user_id, id))? {
                return Err(ActionError::NotFound { kind: "Expense", id });
            }
            debug!(user_id, expense_id = id, "expense deleted");
            c.commit(Change::ExpenseDeleted(id));
            Ok(())
        })
    }

    pub fn add_burned(&mut self, activity: &str, calories: Option<f64>) -> Result<BurnedActivity, ActionError> {
        self.act(Some("Activity added"), |c| {
            let user_id = c.require_session()?;
            let data = BurnedActivityCreate {
                date: format_timestamp(&c.clock.now()),
                activity: required(activity)?.to_string(),
                calories: positive(calories, "calorie count")?,
            };
            let burned = c
                .database
                .with_conn(|conn| BurnedActivity::create(conn, user_id, &data))?;
            debug!(user_id, burned_id = burned.id, "activity added");
            c.commit(Change::BurnedAdded(burned.clone()));
            Ok(burned)
        })
    }

    pub fn delete_burned(&mut self, id: i64) -> Result<(), ActionError> {
        self.act(Some("Activity deleted"), |c| {
            let user_id = c.require_session()?;
            if !c.database.with_conn(|conn| BurnedActivity::delete(conn, user_id, id))? {
                return Err(ActionError::NotFound { kind: "Activity", id });
            }
            debug!(user_id, burned_id = id, "activity deleted");
            c.commit(Change::BurnedDeleted(id));
            Ok(())
        })
    }

    pub fn add_weight(&mut self, weight: Option<f64>) -> Result<WeightEntry, ActionError> {
        self.act(Some("Weight logged!"), |c| {
            let user_id = c.require_session()?;
            let data = WeightEntryCreate {
                date: format_timestamp(&c.clock.now()),
                weight: positive(weight, "weight")?,
            };
            let entry = c.database.with_conn(|conn| WeightEntry::create(conn, user_id, &data))?;
            debug!(user_id, weight_id = entry.id, "weight logged");
            c.commit(Change::WeightAdded(entry.clone()));
            Ok(entry)
        })
    }

    pub fn delete_weight(&mut self, id: i64) -> Result<(), ActionError> {
        self.act(Some("Weight deleted"), |c| {
            let user_id = c.require_session()?;
            if !c.database.with_conn(|conn| WeightEntry::delete(conn, user_id, id))? {
                return Err(ActionError::NotFound { kind: "Weight entry", id });
            }
            debug!(user_id, weight_id = id, "weight deleted");
            c.commit(Change::WeightDeleted(id));
            Ok(())
        })
    }

    // --- Summaries ---

    pub fn weight_log(&mut self) -> Result<WeightLogView, ActionError> {
        self.act(None, |c| {
            c.require_session()?;
            Ok(WeightLogView {
                summary: stats::weight_summary(&c.state.weights),
                entries: c.state.weights.len(),
                rows: stats::weight_rows(&c.state.weights),
            })
        })
    }

    pub fn today(&mut self) -> Result<TodayView, ActionError> {
        self.act(None, |c| {
            c.require_session()?;
            Ok(c.today_view())
        })
    }

    fn today_view(&self) -> TodayView {
        stats::today_view(
            self.clock.today(),
            &self.state.meals,
            &self.state.burned,
            &self.state.expenses,
            &self.state.habits,
        )
    }

    pub fn history(&mut self) -> Result<HistoryView, ActionError> {
        self.act(None, |c| {
            c.require_session()?;
            let days = stats::aggregate_days(&c.state.meals, &c.state.burned, &c.state.habits);
            Ok(HistoryView {
                today: c.today_view(),
                days: stats::history(&days),
                meals: c.state.meals.clone(),
                burned: c.state.burned.clone(),
                expenses: c.state.expenses.clone(),
            })
        })
    }

    // --- Charts ---

    /// Consistency chart of the selected month, written under `dir`
    pub fn render_consistency_chart(&mut self, dir: &Path) -> Result<ChartFile, ActionError> {
        self.act(Some("Chart saved"), |c| {
            c.require_session()?;
            let counts = stats::monthly_counts(&c.state.habits, c.month);
            let ratios = stats::completion_ratios(&counts, c.state.habits.len());
            let png = charts::render_consistency_chart(
                &format!("Consistency {}", c.month.label()),
                counts.len(),
                ratios.as_deref(),
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
            )?;
            let file_name = format!("consistency-{}-{:02}.png", c.month.year, c.month.month);
            let path = charts::save_png(dir, &file_name, &png)?;
            debug!(path = %path.display(), "consistency chart written");
            Ok(ChartFile {
                path,
                points: counts.len(),
            })
        })
    }

    pub fn render_weight_chart(&mut self, dir: &Path) -> Result<ChartFile, ActionError> {
        self.act(Some("Chart saved"), |c| {
            c.require_session()?;
            let png = charts::render_weight_chart(&c.state.weights, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
            let path = charts::save_png(dir, "weight.png", &png)?;
            debug!(path = %path.display(), "weight chart written");
            Ok(ChartFile {
                path,
                points: c.state.weights.len(),
            })
        })
    }

    // --- Maintenance ---

    /// Delete every record of the user and start again from the default habits
    pub fn reset_all(&mut self) -> Result<ResetSummary, ActionError> {
        self.act(Some("All data reset!"), |c| {
            let user_id = c.require_session()?;
            let summary = reset_user_data(&c.database, user_id)?;
            info!(user_id, deleted = summary.total_deleted(), "all user data reset");
            c.commit(Change::Reset {
                habits: summary.habits.clone(),
            });
            c.draft.clear();
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::db::migrations::run_migrations;
    use crate::models::DEFAULT_HABITS;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn controller() -> Controller {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        Controller::new(db, Arc::new(FixedClock::at_noon(today())))
    }

    fn signed_in() -> Controller {
        let mut c = controller();
        c.sign_up("ada@example.com", "secret1").unwrap();
        c
    }

    #[test]
    fn test_actions_need_a_session() {
        let mut c = controller();
        assert!(matches!(c.add_habit("Read"), Err(ActionError::NotSignedIn)));
        assert_eq!(c.notice().unwrap().kind, NoticeKind::Error);
        assert!(matches!(c.navigate(Screen::History), Err(ActionError::NotSignedIn)));
        assert!(c.navigate(Screen::Landing).is_ok());
    }

    #[test]
    fn test_sign_up_loads_default_habits() {
        let c = signed_in();
        assert_eq!(c.state().habits.len(), DEFAULT_HABITS.len());
        assert_eq!(c.notice().unwrap().message, "Account created!");
    }

    #[test]
    fn test_login_failure_is_reported() {
        let mut c = controller();
        let err = c.log_in("ada@example.com", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(c.notice().unwrap(), &Notice::error("Invalid email or password"));
    }

    #[test]
    fn test_navigation_is_free_form_when_signed_in() {
        let mut c = signed_in();
        for screen in [Screen::WeightLog, Screen::History, Screen::HabitMatrix, Screen::Landing] {
            assert_eq!(c.navigate(screen).unwrap().screen, screen);
        }
    }

    #[test]
    fn test_toggle_persists_and_survives_relogin() {
        let mut c = signed_in();
        let id = c.state().habits[0].id;
        let yesterday = today().pred_opt().unwrap();

        assert!(c.toggle_habit_day(id, None).unwrap());
        assert!(c.toggle_habit_day(id, Some(yesterday)).unwrap());
        assert_eq!(c.habit_matrix().unwrap().rows[0].streak, 2);

        c.log_out();
        assert!(c.state().is_empty());
        assert_eq!(c.screen(), Screen::Landing);

        c.log_in("ada@example.com", "secret1").unwrap();
        assert_eq!(c.state().habits.len(), DEFAULT_HABITS.len());
        assert!(c.state().habit(id).unwrap().is_completed_on(today()));

        assert!(!c.toggle_habit_day(id, None).unwrap());
        assert_eq!(c.habit_matrix().unwrap().rows[0].streak, 0);
    }

    #[test]
    fn test_habit_add_rename_delete() {
        let mut c = signed_in();
        let habit = c.add_habit("  Stretch ").unwrap();
        assert_eq!(habit.name, "Stretch");
        assert_eq!(c.state().habits.last().unwrap().id, habit.id);

        c.rename_habit(habit.id, "Yoga").unwrap();
        assert_eq!(c.state().habit(habit.id).unwrap().name, "Yoga");

        c.delete_habit(habit.id).unwrap();
        assert!(c.state().habit(habit.id).is_none());
        assert!(matches!(
            c.delete_habit(habit.id),
            Err(ActionError::NotFound { kind: "Habit", .. })
        ));
        assert!(matches!(c.add_habit("   "), Err(ActionError::Validation(_))));
    }

    #[test]
    fn test_save_meal_validation_and_success() {
        let mut c = signed_in();

        assert_eq!(c.save_meal().unwrap_err().to_string(), "Missing info");

        c.edit_draft(Some("lunch"), Some("Bowl"), Some(vec![FoodLine::new("Pizza", 1.0)]))
            .unwrap();
        assert_eq!(c.save_meal().unwrap_err().to_string(), "Add food items");
        assert!(c.state().meals.is_empty());

        c.edit_draft(
            None,
            None,
            Some(vec![
                FoodLine::new("Rice (White, Cooked)", "150"),
                FoodLine::new("chicken breast (cooked)", 100.0),
            ]),
        )
        .unwrap();
        assert!((c.calculate_macros().totals.calories - 360.0).abs() < 1e-9);

        let meal = c.save_meal().unwrap();
        assert_eq!(meal.category, MealCategory::Lunch);
        assert_eq!(meal.date, "2025-03-10T12:00:00.000+00:00");
        assert_eq!(c.draft(), &MealDraft::default());
        assert_eq!(c.state().meals.len(), 1);
        assert!((c.today().unwrap().summary.calories - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_edit_draft_rejects_unknown_category_and_extra_rows() {
        let mut c = controller();
        assert!(c.edit_draft(Some("brunch"), None, None).is_err());
        assert!(c
            .edit_draft(None, None, Some(vec![FoodLine::new("Apple", 1.0); 6]))
            .is_err());
        assert!(c.add_food_row());
        assert!(c.remove_food_row());
        assert!(!c.remove_food_row());
    }

    #[test]
    fn test_failed_draft_edit_changes_nothing() {
        let mut c = controller();
        c.edit_draft(Some("breakfast"), Some("Toast"), Some(vec![FoodLine::new("Bread (Slice)", 2.0)]))
            .unwrap();
        let before = c.draft().clone();

        let too_many = vec![FoodLine::new("Apple", 1.0); MAX_FOOD_ROWS + 1];
        assert!(c.edit_draft(Some("dinner"), Some("Feast"), Some(too_many)).is_err());
        assert_eq!(c.draft(), &before);

        assert!(c.edit_draft(Some("brunch"), Some("Feast"), None).is_err());
        assert_eq!(c.draft(), &before);
    }

    #[test]
    fn test_log_out_consumes_the_session_change() {
        let mut c = signed_in();
        c.log_out();
        assert!(!c.session_rx.has_changed().unwrap());
        assert!(c.session().is_none());
        assert_eq!(c.notice().unwrap().message, "Logged out successfully");
    }

    #[test]
    fn test_entries_feed_today_and_weight_log() {
        let mut c = signed_in();
        assert_eq!(c.add_expense("Coffee", None, "").unwrap_err().to_string(), "Missing info");
        assert_eq!(
            c.add_expense("Coffee", Some(-2.0), "").unwrap_err().to_string(),
            "Enter a valid amount"
        );

        c.add_expense("Coffee", Some(3.5), "Flat white").unwrap();
        c.add_expense("Lunch", Some(11.0), "").unwrap();
        c.add_burned("Run", Some(300.0)).unwrap();
        c.add_weight(Some(80.0)).unwrap();
        let second = c.add_weight(Some(79.4)).unwrap();

        let today = c.today().unwrap();
        assert!((today.expenses_total - 14.5).abs() < 1e-9);
        assert!((today.net_calories + 300.0).abs() < 1e-9);

        let log = c.weight_log().unwrap();
        assert_eq!(log.entries, 2);
        assert_eq!(log.rows[0].change, None);
        assert!((log.rows[1].change.unwrap() + 0.6).abs() < 1e-9);
        assert!((log.summary.unwrap().change + 0.6).abs() < 1e-9);

        c.delete_weight(second.id).unwrap();
        assert_eq!(c.weight_log().unwrap().entries, 1);

        let history = c.history().unwrap();
        assert_eq!(history.days.len(), 1);
        assert_eq!(history.days[0].summary.burned, 300.0);
        assert_eq!(history.expenses[0].name, "Lunch");
    }

    #[test]
    fn test_failed_write_leaves_snapshot_unchanged() {
        let mut c = signed_in();
        c.add_expense("Coffee", Some(3.5), "").unwrap();
        let before = c.state().clone();

        c.database
            .with_conn(|conn| Ok(conn.execute_batch("DROP TABLE expenses")?))
            .unwrap();

        assert!(matches!(
            c.add_expense("Tea", Some(2.0), ""),
            Err(ActionError::Storage(_))
        ));
        assert_eq!(c.state(), &before);
        assert_eq!(c.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_reset_all_keeps_only_default_habits() {
        let mut c = signed_in();
        c.add_habit("Custom").unwrap();
        c.add_weight(Some(70.0)).unwrap();
        c.add_burned("Swim", Some(200.0)).unwrap();

        let summary = c.reset_all().unwrap();
        assert_eq!(summary.weights_deleted, 1);
        assert_eq!(c.state().habits.len(), DEFAULT_HABITS.len());
        assert!(c.state().weights.is_empty());
        assert!(c.state().burned.is_empty());
        assert_eq!(c.notice().unwrap().message, "All data reset!");
    }

    #[test]
    fn test_shift_month() {
        let mut c = signed_in();
        let matrix = c.shift_month(-1).unwrap();
        assert_eq!(matrix.month, YearMonth::new(2025, 2).unwrap());
        assert_eq!(matrix.days_in_month, 28);
        assert_eq!(matrix.today, None);
        assert_eq!(c.shift_month(2).unwrap().month, YearMonth::new(2025, 4).unwrap());
    }

    #[test]
    fn test_shift_month_out_of_range_keeps_selection() {
        let mut c = signed_in();
        for delta in [i32::MAX, i32::MIN, 4_000_000] {
            let err = c.shift_month(delta).unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)));
            assert_eq!(c.view().month, YearMonth::new(2025, 3).unwrap());
            assert_eq!(c.notice().unwrap().kind, NoticeKind::Error);
        }
        let matrix = c.shift_month(1).unwrap();
        assert_eq!(matrix.days_in_month, 30);
    }

    #[test]
    fn test_session_changes_from_the_auth_stream() {
        let mut c = signed_in();
        c.auth().log_out();
        assert!(c.session().is_none());
        assert!(c.state().is_empty());

        c.auth().log_in("ada@example.com", "secret1").unwrap();
        assert!(c.session().is_some());
        assert_eq!(c.state().habits.len(), DEFAULT_HABITS.len());
    }

    #[test]
    fn test_empty_weight_chart_is_reported() {
        let mut c = signed_in();
        let dir = std::env::temp_dir();
        assert!(matches!(
            c.render_weight_chart(&dir),
            Err(ActionError::Chart(ChartError::NoData))
        ));
        assert_eq!(c.notice().unwrap().message, "No data to chart");
    }
}
