//! Lifelog MCP Server Implementation
//!
//! Exposes every tracker action as an MCP tool. Actions run through one
//! shared view controller, one at a time.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::calendar::{parse_date_key, SystemClock};
use crate::config::Config;
use crate::controller::{ActionError, Controller, Notice, Screen};
use crate::db::Database;
use crate::nutrition::{FoodLine, Quantity};
use crate::tools::foods;
use crate::tools::status::StatusTracker;

/// Lifelog MCP Service
#[derive(Clone)]
pub struct LifelogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    controller: Arc<std::sync::Mutex<Controller>>,
    chart_dir: PathBuf,
    tool_router: ToolRouter<LifelogService>,
}

impl LifelogService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.chart_dir.clone(),
            ))),
            controller: Arc::new(std::sync::Mutex::new(Controller::new(
                database,
                Arc::new(SystemClock),
            ))),
            chart_dir: config.chart_dir.clone(),
            tool_router: Self::tool_router(),
        }
    }

    /// Run one controller action. Action failures become an error tool
    /// result carrying the notice; only infrastructure faults are `McpError`.
    fn run<T, F>(&self, f: F) -> Result<CallToolResult, McpError>
    where
        T: Serialize,
        F: FnOnce(&mut Controller) -> Result<T, ActionError>,
    {
        let mut controller = self
            .controller
            .lock()
            .map_err(|_| McpError::internal_error("Controller lock poisoned", None))?;

        match f(&mut *controller) {
            Ok(result) => {
                let body = ActionResponse {
                    notice: controller.notice().cloned(),
                    result,
                };
                let json = serde_json::to_string_pretty(&body)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(e) => {
                let notice = controller
                    .notice()
                    .cloned()
                    .unwrap_or_else(|| Notice::error(e.to_string()));
                let json = serde_json::to_string_pretty(&notice)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::error(vec![Content::text(json)]))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ActionResponse<T: Serialize> {
    notice: Option<Notice>,
    result: T,
}

// ============================================================================
// Account Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CredentialsParams {
    /// Account email
    pub email: String,
    /// Password (at least 6 characters)
    pub password: String,
}

// ============================================================================
// Navigation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NavigateParams {
    /// Screen: landing, habit_matrix, daily_log, weight_log, history
    pub screen: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShiftMonthParams {
    /// Months to move; -1 for previous, 1 for next
    pub delta: i32,
}

// ============================================================================
// Habit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddHabitParams {
    /// Habit name
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenameHabitParams {
    /// Habit ID
    pub id: i64,
    /// New name
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleHabitDayParams {
    /// Habit ID
    pub id: i64,
    /// Day to flip (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordIdParams {
    /// Record ID
    pub id: i64,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// Filter by name (case-insensitive substring)
    pub query: Option<String>,
}

/// Quantity as a number or as text such as "150g"
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum QuantityParam {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodRowParams {
    /// Food name from list_foods (case-insensitive)
    pub name: String,
    /// Grams/ml for mass and volume foods, item count for countable foods
    pub quantity: QuantityParam,
}

impl From<FoodRowParams> for FoodLine {
    fn from(p: FoodRowParams) -> Self {
        let quantity = match p.quantity {
            QuantityParam::Number(n) => Quantity::Number(n),
            QuantityParam::Text(s) => Quantity::Text(s),
        };
        FoodLine {
            name: p.name,
            quantity,
        }
    }
}

fn food_rows(items: Option<Vec<FoodRowParams>>) -> Option<Vec<FoodLine>> {
    items.map(|rows| rows.into_iter().map(FoodLine::from).collect())
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateMacrosParams {
    /// Up to 5 food rows; omitted keeps the current draft rows
    pub items: Option<Vec<FoodRowParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMealParams {
    /// breakfast, lunch, snacks, or dinner
    pub category: Option<String>,
    /// Meal name
    pub name: Option<String>,
    /// Up to 5 food rows; omitted keeps the current draft rows
    pub items: Option<Vec<FoodRowParams>>,
}

// ============================================================================
// Entry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExpenseParams {
    /// What the money was spent on
    pub name: String,
    /// Amount spent
    pub amount: Option<f64>,
    /// Free-text details
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBurnedParams {
    /// Activity description
    pub activity: String,
    /// Calories burned (kcal)
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWeightParams {
    /// Body weight in kg
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResetAllDataParams {
    /// Must be true; deletes every record of the signed-in user
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LifelogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Lifelog service including build info, database status, and process information")]
    async fn lifelog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for using the Lifelog tools. Call this at the start of a session or when unsure how to log something.")]
    fn lifelog_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LIFELOG_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LIFELOG_INSTRUCTIONS)]))
    }

    // --- Account ---

    #[tool(description = "Create an account and sign in")]
    fn sign_up(&self, Parameters(p): Parameters<CredentialsParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.sign_up(&p.email, &p.password))
    }

    #[tool(description = "Sign in and load the account's records")]
    fn log_in(&self, Parameters(p): Parameters<CredentialsParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.log_in(&p.email, &p.password))
    }

    #[tool(description = "Sign out, clear loaded records and return to the landing screen")]
    fn log_out(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| {
            c.log_out();
            Ok(c.view())
        })
    }

    #[tool(description = "Get the signed-in account, if any")]
    fn session(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| {
            let session = c.session();
            Ok(serde_json::json!({
                "signed_in": session.is_some(),
                "session": session,
            }))
        })
    }

    // --- Navigation ---

    #[tool(description = "Switch screen: landing, habit_matrix, daily_log, weight_log, history")]
    fn navigate(&self, Parameters(p): Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        let screen = Screen::from_str(&p.screen).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown screen: {}", p.screen), None)
        })?;
        self.run(|c| c.navigate(screen))
    }

    #[tool(description = "Get the current screen, selected month, meal draft and last notice")]
    fn current_view(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| Ok(c.view()))
    }

    #[tool(description = "Move the selected month of the habit matrix back or forward")]
    fn shift_month(&self, Parameters(p): Parameters<ShiftMonthParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.shift_month(p.delta))
    }

    // --- Habits ---

    #[tool(description = "Get the habit matrix for the selected month: per-day completion, streaks and daily consistency")]
    fn list_habit_matrix(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.habit_matrix())
    }

    #[tool(description = "Add a habit")]
    fn add_habit(&self, Parameters(p): Parameters<AddHabitParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.add_habit(&p.name))
    }

    #[tool(description = "Rename a habit")]
    fn rename_habit(&self, Parameters(p): Parameters<RenameHabitParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.rename_habit(p.id, &p.name))
    }

    #[tool(description = "Delete a habit and its completion history")]
    fn delete_habit(&self, Parameters(p): Parameters<RecordIdParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.delete_habit(p.id))
    }

    #[tool(description = "Mark or unmark a habit for one day (defaults to today)")]
    fn toggle_habit_day(&self, Parameters(p): Parameters<ToggleHabitDayParams>) -> Result<CallToolResult, McpError> {
        let date = match p.date.as_deref() {
            Some(s) => Some(parse_date_key(s).ok_or_else(|| {
                McpError::invalid_params(format!("Invalid date (expected YYYY-MM-DD): {}", s), None)
            })?),
            None => None,
        };
        self.run(|c| {
            let completed = c.toggle_habit_day(p.id, date)?;
            Ok(serde_json::json!({ "id": p.id, "completed": completed }))
        })
    }

    // --- Meals ---

    #[tool(description = "List the foods the meal calculator knows, with macros per unit")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(p.query.as_deref());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Preview macros for up to 5 food rows without saving. Unknown foods and empty quantities are skipped.")]
    fn calculate_macros(&self, Parameters(p): Parameters<CalculateMacrosParams>) -> Result<CallToolResult, McpError> {
        let rows = food_rows(p.items);
        self.run(|c| {
            if rows.is_some() {
                c.edit_draft(None, None, rows)?;
            }
            Ok(c.calculate_macros())
        })
    }

    #[tool(description = "Save a meal (category, name, up to 5 food rows). Totals are computed from the food table.")]
    fn save_meal(&self, Parameters(p): Parameters<SaveMealParams>) -> Result<CallToolResult, McpError> {
        let rows = food_rows(p.items);
        self.run(|c| {
            c.edit_draft(p.category.as_deref(), p.name.as_deref(), rows)?;
            c.save_meal()
        })
    }

    #[tool(description = "Delete a saved meal")]
    fn delete_meal(&self, Parameters(p): Parameters<RecordIdParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.delete_meal(p.id))
    }

    // --- Entries ---

    #[tool(description = "Log an expense for now")]
    fn add_expense(&self, Parameters(p): Parameters<AddExpenseParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.add_expense(&p.name, p.amount, &p.details))
    }

    #[tool(description = "Delete an expense")]
    fn delete_expense(&self, Parameters(p): Parameters<RecordIdParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.delete_expense(p.id))
    }

    #[tool(description = "Log calories burned by an activity for now")]
    fn add_burned(&self, Parameters(p): Parameters<AddBurnedParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.add_burned(&p.activity, p.calories))
    }

    #[tool(description = "Delete a burned-calories entry")]
    fn delete_burned(&self, Parameters(p): Parameters<RecordIdParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.delete_burned(p.id))
    }

    #[tool(description = "Log body weight (kg) for now")]
    fn add_weight(&self, Parameters(p): Parameters<AddWeightParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.add_weight(p.weight))
    }

    #[tool(description = "Delete a weight entry")]
    fn delete_weight(&self, Parameters(p): Parameters<RecordIdParams>) -> Result<CallToolResult, McpError> {
        self.run(|c| c.delete_weight(p.id))
    }

    #[tool(description = "Get weight entries oldest first with the change from the previous entry, plus latest, first and overall change")]
    fn weight_log(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.weight_log())
    }

    // --- Summaries ---

    #[tool(description = "Get today's intake, burned and net calories, habit completion and expense total")]
    fn today_summary(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.today())
    }

    #[tool(description = "Get per-day summaries newest first, with all meals, activities and expenses")]
    fn history(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.history())
    }

    // --- Charts ---

    #[tool(description = "Render the selected month's habit consistency chart to a PNG file")]
    fn render_consistency_chart(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.render_consistency_chart(&self.chart_dir))
    }

    #[tool(description = "Render the weight chart to a PNG file")]
    fn render_weight_chart(&self) -> Result<CallToolResult, McpError> {
        self.run(|c| c.render_weight_chart(&self.chart_dir))
    }

    // --- Maintenance ---

    #[tool(description = "Delete ALL records of the signed-in user and restore the default habits. Requires confirm=true. Cannot be undone.")]
    fn reset_all_data(&self, Parameters(p): Parameters<ResetAllDataParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::invalid_params(
                "reset_all_data deletes everything; pass confirm=true to proceed",
                None,
            ));
        }
        self.run(|c| c.reset_all())
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LifelogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lifelog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Lifelog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Lifelog - daily habit, meal, expense, activity and weight tracking. \
                 IMPORTANT: Call lifelog_instructions first. \
                 Account: sign_up/log_in/log_out/session. \
                 Screens: navigate/current_view/shift_month. \
                 Habits: list_habit_matrix, add/rename/delete_habit, toggle_habit_day. \
                 Meals: list_foods, calculate_macros, save_meal, delete_meal. \
                 Entries: add/delete_expense, add/delete_burned, add/delete_weight, weight_log. \
                 Summaries: today_summary, history. \
                 Charts: render_consistency_chart, render_weight_chart. \
                 Maintenance: reset_all_data (confirm=true), lifelog_status."
                    .into(),
            ),
        }
    }
}
