//! Database migrations
//!
//! Schema creation and versioning.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: accounts and the five tracked record kinds
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,            -- argon2 PHC string
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- HABITS
        -- ============================================
        CREATE TABLE habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_habits_user ON habits(user_id);

        -- One row per (habit, day); the primary key keeps the set duplicate-free
        CREATE TABLE habit_completions (
            habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            date_key TEXT NOT NULL,                 -- "2025-01-09"
            PRIMARY KEY (habit_id, date_key)
        );

        -- ============================================
        -- MEALS
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                     -- RFC 3339, local offset
            category TEXT NOT NULL CHECK(category IN ('breakfast', 'lunch', 'snacks', 'dinner')),
            name TEXT NOT NULL,

            -- Macro Calculator result at save time
            total_protein REAL NOT NULL DEFAULT 0,
            total_carbs REAL NOT NULL DEFAULT 0,
            total_fats REAL NOT NULL DEFAULT 0,
            total_calories REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX idx_meals_user ON meals(user_id);

        CREATE TABLE meal_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_id INTEGER NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            food_name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL                      -- "qty", "g", "ml"
        );

        CREATE INDEX idx_meal_items_meal ON meal_items(meal_id);

        -- ============================================
        -- BURNED ACTIVITIES
        -- ============================================
        CREATE TABLE burned_activities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            activity TEXT NOT NULL,
            calories REAL NOT NULL
        );

        CREATE INDEX idx_burned_user ON burned_activities(user_id);

        -- ============================================
        -- EXPENSES
        -- ============================================
        CREATE TABLE expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            details TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX idx_expenses_user ON expenses(user_id);

        -- ============================================
        -- WEIGHTS
        -- ============================================
        CREATE TABLE weights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            weight REAL NOT NULL                    -- kg
        );

        CREATE INDEX idx_weights_user ON weights(user_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
