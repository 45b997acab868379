//! Habit model
//!
//! A named daily habit and the set of days it was completed on.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{with_savepoint, DbError, DbResult};

/// Habits every new account starts with
pub const DEFAULT_HABITS: [&str; 8] = [
    "Drink 3L Water",
    "Gym Workout",
    "Read 10 Pages",
    "No Sugar",
    "Sleep 8 Hours",
    "10k Steps",
    "Take Creatine",
    "Meditation",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Serialized as `YYYY-MM-DD` date-keys
    pub completed_dates: BTreeSet<NaiveDate>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitCreate {
    pub name: String,
    pub completed_dates: BTreeSet<NaiveDate>,
}

/// Partial update; `completed_dates` replaces the whole set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub completed_dates: Option<BTreeSet<NaiveDate>>,
}

impl Habit {
    /// Row without completions; callers fill `completed_dates`
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            completed_dates: BTreeSet::new(),
            created_at: row.get("created_at")?,
        })
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    pub fn create(conn: &Connection, user_id: i64, data: &HabitCreate) -> DbResult<Self> {
        let id = with_savepoint(conn, "habit_create", |conn| {
            conn.execute(
                "INSERT INTO habits (user_id, name) VALUES (?1, ?2)",
                params![user_id, data.name],
            )?;
            let id = conn.last_insert_rowid();
            insert_completions(conn, id, &data.completed_dates)?;
            Ok(id)
        })?;

        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let habit = conn
            .query_row(
                "SELECT * FROM habits WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                Self::from_row,
            )
            .optional()?;

        match habit {
            Some(mut habit) => {
                let mut stmt = conn.prepare(
                    "SELECT date_key FROM habit_completions WHERE habit_id = ?1",
                )?;
                habit.completed_dates = stmt
                    .query_map([id], |row| row.get::<_, NaiveDate>(0))?
                    .collect::<Result<BTreeSet<_>, _>>()?;
                Ok(Some(habit))
            }
            None => Ok(None),
        }
    }

    /// All habits of a user with their completions, in creation order
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM habits WHERE user_id = ?1 ORDER BY id")?;
        let mut habits = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.habit_id, c.date_key FROM habit_completions c
            INNER JOIN habits h ON h.id = c.habit_id
            WHERE h.user_id = ?1
            "#,
        )?;
        let mut by_habit: BTreeMap<i64, BTreeSet<NaiveDate>> = BTreeMap::new();
        let rows = stmt.query_map([user_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, NaiveDate>(1)?))
        })?;
        for row in rows {
            let (habit_id, date) = row?;
            by_habit.entry(habit_id).or_default().insert(date);
        }

        for habit in &mut habits {
            if let Some(dates) = by_habit.remove(&habit.id) {
                habit.completed_dates = dates;
            }
        }

        Ok(habits)
    }

    pub fn update(
        conn: &Connection,
        user_id: i64,
        id: i64,
        data: &HabitUpdate,
    ) -> DbResult<Option<Self>> {
        if Self::get_by_id(conn, user_id, id)?.is_none() {
            return Ok(None);
        }

        with_savepoint(conn, "habit_update", |conn| {
            if let Some(ref name) = data.name {
                conn.execute(
                    "UPDATE habits SET name = ?1 WHERE id = ?2 AND user_id = ?3",
                    params![name, id, user_id],
                )?;
            }
            if let Some(ref dates) = data.completed_dates {
                conn.execute("DELETE FROM habit_completions WHERE habit_id = ?1", [id])?;
                insert_completions(conn, id, dates)?;
            }
            Ok(())
        })?;

        Self::get_by_id(conn, user_id, id)
    }

    /// Mark or unmark a single day. Returns `false` if the habit is not the user's.
    pub fn set_completed(
        conn: &Connection,
        user_id: i64,
        id: i64,
        date: NaiveDate,
        completed: bool,
    ) -> DbResult<bool> {
        let owned: Option<i64> = conn
            .query_row(
                "SELECT id FROM habits WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        if owned.is_none() {
            return Ok(false);
        }

        if completed {
            conn.execute(
                "INSERT OR IGNORE INTO habit_completions (habit_id, date_key) VALUES (?1, ?2)",
                params![id, date],
            )?;
        } else {
            conn.execute(
                "DELETE FROM habit_completions WHERE habit_id = ?1 AND date_key = ?2",
                params![id, date],
            )?;
        }
        Ok(true)
    }

    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM habits WHERE user_id = ?1", [user_id])?)
    }

    /// Insert the default habit list for a user
    pub fn seed_defaults(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        DEFAULT_HABITS
            .iter()
            .map(|name| {
                Self::create(
                    conn,
                    user_id,
                    &HabitCreate {
                        name: name.to_string(),
                        completed_dates: BTreeSet::new(),
                    },
                )
            })
            .collect()
    }
}

fn insert_completions(conn: &Connection, habit_id: i64, dates: &BTreeSet<NaiveDate>) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO habit_completions (habit_id, date_key) VALUES (?1, ?2)",
    )?;
    for date in dates {
        stmt.execute(params![habit_id, date])?;
    }
    Ok(())
}
