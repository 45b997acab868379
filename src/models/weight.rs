//! Weight model
//!
//! Body weight measurements in kilograms.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    /// Kilograms
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryCreate {
    pub date: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightEntryUpdate {
    pub weight: Option<f64>,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight: row.get("weight")?,
        })
    }

    pub fn create(conn: &Connection, user_id: i64, data: &WeightEntryCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO weights (user_id, date, weight) VALUES (?1, ?2, ?3)",
            params![user_id, data.date, data.weight],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let entry = conn
            .query_row(
                "SELECT * FROM weights WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                Self::from_row,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weights WHERE user_id = ?1")?;
        let entries = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn update(
        conn: &Connection,
        user_id: i64,
        id: i64,
        data: &WeightEntryUpdate,
    ) -> DbResult<Option<Self>> {
        if let Some(weight) = data.weight {
            conn.execute(
                "UPDATE weights SET weight = ?1 WHERE id = ?2 AND user_id = ?3",
                params![weight, id, user_id],
            )?;
        }
        Self::get_by_id(conn, user_id, id)
    }

    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM weights WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM weights WHERE user_id = ?1", [user_id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::User;

    #[test]
    fn test_create_update_format() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = User::create(&conn, "scale@example.com", "hash").unwrap();

        let entry = WeightEntry::create(
            &conn,
            user.id,
            &WeightEntryCreate {
                date: "2025-03-01T07:00:00.000+00:00".into(),
                weight: 80.25,
            },
        )
        .unwrap();
        assert_eq!(entry.weight, 80.25);

        let updated = WeightEntry::update(
            &conn,
            user.id,
            entry.id,
            &WeightEntryUpdate { weight: Some(79.9) },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.weight, 79.9);
        assert_eq!(WeightEntry::list_for_user(&conn, user.id).unwrap().len(), 1);
    }
}
