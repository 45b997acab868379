//! Burned activity model
//!
//! Calories burned through an activity, entered by hand.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnedActivity {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub activity: String,
    pub calories: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnedActivityCreate {
    pub date: String,
    pub activity: String,
    pub calories: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurnedActivityUpdate {
    pub activity: Option<String>,
    pub calories: Option<f64>,
}

impl BurnedActivity {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            activity: row.get("activity")?,
            calories: row.get("calories")?,
        })
    }

    pub fn create(conn: &Connection, user_id: i64, data: &BurnedActivityCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO burned_activities (user_id, date, activity, calories)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, data.date, data.activity, data.calories],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let activity = conn
            .query_row(
                "SELECT * FROM burned_activities WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                Self::from_row,
            )
            .optional()?;
        Ok(activity)
    }

    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM burned_activities WHERE user_id = ?1")?;
        let activities = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    pub fn update(
        conn: &Connection,
        user_id: i64,
        id: i64,
        data: &BurnedActivityUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref activity) = data.activity {
            params_vec.push(Box::new(activity.clone()));
            updates.push(format!("activity = ?{}", params_vec.len()));
        }
        if let Some(calories) = data.calories {
            params_vec.push(Box::new(calories));
            updates.push(format!("calories = ?{}", params_vec.len()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, user_id, id);
        }

        params_vec.push(Box::new(id));
        let id_param = params_vec.len();
        params_vec.push(Box::new(user_id));
        let sql = format!(
            "UPDATE burned_activities SET {} WHERE id = ?{} AND user_id = ?{}",
            updates.join(", "),
            id_param,
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, user_id, id)
    }

    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM burned_activities WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM burned_activities WHERE user_id = ?1", [user_id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::User;

    #[test]
    fn test_create_update_delete() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = User::create(&conn, "burn@example.com", "hash").unwrap();

        let run = BurnedActivity::create(
            &conn,
            user.id,
            &BurnedActivityCreate {
                date: "2025-03-01T18:00:00.000+00:00".into(),
                activity: "Run".into(),
                calories: 320.0,
            },
        )
        .unwrap();

        let updated = BurnedActivity::update(
            &conn,
            user.id,
            run.id,
            &BurnedActivityUpdate {
                calories: Some(350.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.calories, 350.0);
        assert_eq!(updated.activity, "Run");

        assert!(BurnedActivity::delete(&conn, user.id, run.id).unwrap());
        assert!(BurnedActivity::list_for_user(&conn, user.id).unwrap().is_empty());
    }
}
