//! Local account provider
//!
//! Sign-up, login and logout against the `users` table, with the current
//! session published on a `watch` channel. Subscribers see `None` when
//! nobody is signed in.

mod password;

pub use password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::db::{Database, DbError};
use crate::models::User;

/// Authentication failures. Messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("An account with this email already exists")]
    EmailInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] DbError),
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

pub struct AuthService {
    database: Database,
    session_tx: watch::Sender<Option<Session>>,
}

impl AuthService {
    pub fn new(database: Database) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            database,
            session_tx,
        }
    }

    /// Stream of session changes; starts at the current session
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    /// Create an account and sign it in
    pub fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let hash = hash_password(password)?;
        let user = self.database.with_conn(|conn| {
            if User::get_by_email(conn, email)?.is_some() {
                return Ok(None);
            }
            User::create(conn, email, &hash).map(Some)
        })?;
        let Some(user) = user else {
            warn!(email = %email, "sign-up rejected, email in use");
            return Err(AuthError::EmailInUse);
        };

        info!(user_id = user.id, "account created");
        Ok(self.publish(Session::from(&user)))
    }

    pub fn log_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }

        let user = self
            .database
            .with_conn(|conn| User::get_by_email(conn, email))?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, "signed in");
        Ok(self.publish(Session::from(&user)))
    }

    pub fn log_out(&self) {
        if let Some(previous) = self.session_tx.send_replace(None) {
            info!(user_id = previous.user_id, "signed out");
        }
    }

    fn publish(&self, session: Session) -> Session {
        self.session_tx.send_replace(Some(session.clone()));
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn service() -> AuthService {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        AuthService::new(db)
    }

    #[test]
    fn test_sign_up_signs_in_and_notifies() {
        let auth = service();
        let mut rx = auth.subscribe();
        assert!(rx.borrow_and_update().is_none());

        let session = auth.sign_up("ada@example.com", "secret1").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().clone(), Some(session.clone()));
        assert_eq!(auth.current(), Some(session));
    }

    #[test]
    fn test_sign_up_validation_messages() {
        let auth = service();
        assert_eq!(
            auth.sign_up("nope", "secret1").unwrap_err().to_string(),
            "Please enter a valid email address"
        );
        assert_eq!(
            auth.sign_up("ada@example.com", "12345").unwrap_err().to_string(),
            "Password should be at least 6 characters"
        );

        auth.sign_up("ada@example.com", "secret1").unwrap();
        assert!(matches!(
            auth.sign_up("ADA@example.com", "secret2"),
            Err(AuthError::EmailInUse)
        ));
    }

    #[test]
    fn test_log_in_and_out() {
        let auth = service();
        let created = auth.sign_up("ada@example.com", "secret1").unwrap();
        auth.log_out();
        assert!(auth.current().is_none());

        assert!(matches!(
            auth.log_in("ada@example.com", "wrong-pass"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.log_in("bob@example.com", "secret1"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(auth.current().is_none());

        let session = auth.log_in(" Ada@Example.com ", "secret1").unwrap();
        assert_eq!(session.user_id, created.user_id);
    }
}
