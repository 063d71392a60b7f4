//! The transaction store seen from the page: list, insert and delete.

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::core::{
        NewTransaction, Transaction, create_transaction, delete_transaction,
        get_transactions_for_user,
    },
    user::UserId,
};

/// The remote store holding every user's transactions.
///
/// Implementations must only ever hand back or delete rows owned by the given
/// user.
pub trait TransactionRepository {
    /// Get all transactions owned by `user_id`, in insertion order.
    fn list(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Persist `new_transaction` and return the stored row with its ID.
    fn insert(
        &self,
        new_transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Delete the transaction `id` owned by `user_id`.
    fn delete(
        &self,
        id: TransactionId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// A [TransactionRepository] backed by the application's SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionRepository {
    db_connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionRepository {
    /// Create a repository that shares `db_connection`.
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

impl TransactionRepository for SqliteTransactionRepository {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Transaction>, Error> {
        self.with_connection(|connection| get_transactions_for_user(user_id, connection))
    }

    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        self.with_connection(|connection| create_transaction(new_transaction, connection))
    }

    async fn delete(&self, id: TransactionId, user_id: &UserId) -> Result<(), Error> {
        self.with_connection(|connection| delete_transaction(id, user_id, connection))
    }
}
