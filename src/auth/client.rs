//! The authentication collaborator: registers users, starts and ends their
//! auth sessions.

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error, PasswordHash,
    user::{UserId, create_user, get_user_by_email},
};

/// Authenticates users and tracks which of them have an active auth session.
pub trait AuthClient {
    /// Register a new user and start their auth session.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if `email` is already registered.
    fn sign_up(
        &self,
        email: &EmailAddress,
        password_hash: PasswordHash,
    ) -> impl Future<Output = Result<UserId, Error>> + Send;

    /// Check a user's credentials and start their auth session.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCredentials] if the email is not registered or
    /// the password does not match.
    fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> impl Future<Output = Result<UserId, Error>> + Send;

    /// End every auth session of `user_id`.
    fn sign_out(&self, user_id: &UserId) -> impl Future<Output = Result<(), Error>> + Send;

    /// Whether `user_id` still has an active auth session.
    fn is_signed_in(&self, user_id: &UserId) -> impl Future<Output = Result<bool, Error>> + Send;
}

/// Create the table of active auth sessions.
///
/// The user table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_auth_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS auth_session (
                user_id TEXT PRIMARY KEY NOT NULL,
                signed_in_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// An [AuthClient] that checks credentials against the user table.
#[derive(Debug, Clone)]
pub struct SqliteAuthClient {
    db_connection: Arc<Mutex<Connection>>,
}

impl SqliteAuthClient {
    /// Create an auth client that shares `db_connection`.
    ///
    /// The database must have been initialised with [crate::initialize_db].
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self { db_connection }
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        f(&connection)
    }
}

fn start_auth_session(user_id: &UserId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO auth_session (user_id, signed_in_at) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET signed_in_at = excluded.signed_in_at",
        (user_id.as_str(), OffsetDateTime::now_utc()),
    )?;

    Ok(())
}

impl AuthClient for SqliteAuthClient {
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<UserId, Error> {
        self.with_connection(|connection| {
            let transaction = connection.unchecked_transaction()?;
            let user = create_user(email, password_hash, &transaction)?;
            start_auth_session(&user.id, &transaction)?;
            transaction.commit()?;

            tracing::info!("registered user {}", user.id);

            Ok(user.id)
        })
    }

    async fn sign_in(&self, email: &EmailAddress, password: &str) -> Result<UserId, Error> {
        let user = match self.with_connection(|connection| get_user_by_email(email, connection)) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        };

        // Verify outside the database lock.
        let is_password_valid = user
            .password_hash
            .verify(password)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        if !is_password_valid {
            return Err(Error::InvalidCredentials);
        }

        self.with_connection(|connection| start_auth_session(&user.id, connection))?;

        Ok(user.id)
    }

    async fn sign_out(&self, user_id: &UserId) -> Result<(), Error> {
        self.with_connection(|connection| {
            connection.execute(
                "DELETE FROM auth_session WHERE user_id = ?1",
                (user_id.as_str(),),
            )?;

            Ok(())
        })
    }

    async fn is_signed_in(&self, user_id: &UserId) -> Result<bool, Error> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM auth_session WHERE user_id = ?1)",
                    (user_id.as_str(),),
                    |row| row.get(0),
                )
                .map_err(Error::from)
        })
    }
}
