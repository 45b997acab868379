//! User model
//!
//! Local accounts. Every other record belongs to exactly one user.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a user; the email must not already exist
    pub fn create(conn: &Connection, email: &str, password_hash: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
            params![email, password_hash],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let user = conn
            .query_row("SELECT * FROM users WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(user)
    }

    /// Case-insensitive lookup
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let user = conn
            .query_row(
                "SELECT * FROM users WHERE email = ?1 COLLATE NOCASE",
                [email],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_create_and_lookup_ignores_email_case() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let user = User::create(&conn, "Ada@Example.com", "hash").unwrap();
        let found = User::get_by_email(&conn, "ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(User::create(&conn, "ADA@example.com", "other").is_err());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = User::create(&conn, "a@b.co", "secret-hash").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
