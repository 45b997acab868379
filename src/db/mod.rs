//! Database module
//!
//! SQLite connection pool and schema migrations.

pub mod connection;
pub mod migrations;

pub use connection::{with_savepoint, Database, DbError, DbResult};
