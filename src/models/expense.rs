//! Expense model
//!
//! Discretionary spending entries.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub name: String,
    pub amount: f64,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub date: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub details: Option<String>,
}

impl Expense {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            details: row.get("details")?,
        })
    }

    pub fn create(conn: &Connection, user_id: i64, data: &ExpenseCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, date, name, amount, details)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![user_id, data.date, data.name, data.amount, data.details],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let expense = conn
            .query_row(
                "SELECT * FROM expenses WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                Self::from_row,
            )
            .optional()?;
        Ok(expense)
    }

    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM expenses WHERE user_id = ?1")?;
        let expenses = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    pub fn update(
        conn: &Connection,
        user_id: i64,
        id: i64,
        data: &ExpenseUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            params_vec.push(Box::new(name.clone()));
            updates.push(format!("name = ?{}", params_vec.len()));
        }
        if let Some(amount) = data.amount {
            params_vec.push(Box::new(amount));
            updates.push(format!("amount = ?{}", params_vec.len()));
        }
        if let Some(ref details) = data.details {
            params_vec.push(Box::new(details.clone()));
            updates.push(format!("details = ?{}", params_vec.len()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, user_id, id);
        }

        params_vec.push(Box::new(id));
        let id_param = params_vec.len();
        params_vec.push(Box::new(user_id));
        let sql = format!(
            "UPDATE expenses SET {} WHERE id = ?{} AND user_id = ?{}",
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
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM expenses WHERE user_id = ?1", [user_id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::User;

    #[test]
    fn test_update_only_touches_given_fields() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = User::create(&conn, "spend@example.com", "hash").unwrap();

        let coffee = Expense::create(
            &conn,
            user.id,
            &ExpenseCreate {
                date: "2025-03-01T09:00:00.000+00:00".into(),
                name: "Coffee".into(),
                amount: 3.5,
                details: "Flat white".into(),
            },
        )
        .unwrap();

        let updated = Expense::update(
            &conn,
            user.id,
            coffee.id,
            &ExpenseUpdate {
                amount: Some(4.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.amount, 4.0);
        assert_eq!(updated.details, "Flat white");

        let missing = Expense::update(&conn, user.id, 999, &ExpenseUpdate::default()).unwrap();
        assert!(missing.is_none());
    }
}
