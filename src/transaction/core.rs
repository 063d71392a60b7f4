//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql, named_params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId, user::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came into or went out of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary deposit.
    Credit,
    /// Money going out, e.g. a grocery bill.
    Debit,
}

impl TransactionType {
    /// The lowercase name stored in the database and shown in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// A stored movement of money belonging to one user.
///
/// Transactions are never edited in place. To create one, insert a
/// [NewTransaction] and use the row the store hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID the store assigned on insert.
    pub id: TransactionId,
    /// When the transaction happened, if the user recorded it.
    pub date: Option<Date>,
    /// The amount in cents. Always non-negative, see `type_` for the direction.
    pub amount: i64,
    /// Whether the amount was credited or debited.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The account the money moved through, e.g. "Everyday".
    pub account: String,
    /// The bucket (category) the transaction is filed under, e.g. "food".
    pub bucket: String,
    /// What the transaction was for.
    pub description: String,
    /// The user the transaction belongs to.
    pub user_id: UserId,
}

/// A transaction that has not been persisted yet and so has no ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Option<Date>,
    /// The amount in cents, must be non-negative.
    pub amount: i64,
    /// Whether the amount was credited or debited.
    pub type_: TransactionType,
    /// The account the money moved through.
    pub account: String,
    /// The bucket the transaction is filed under.
    pub bucket: String,
    /// What the transaction was for.
    pub description: String,
    /// The user the transaction will belong to.
    pub user_id: UserId,
}

/// The largest amount of a single transaction, one trillion dollars in cents.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// Convert an amount in dollars, as typed into the add-transaction form, to cents.
///
/// # Errors
///
/// Returns an [Error::InvalidAmount] if `dollars` is not finite, is not
/// positive, or is larger than [MAX_AMOUNT_CENTS].
pub fn dollars_to_cents(dollars: f64) -> Result<i64, Error> {
    if !dollars.is_finite() {
        return Err(Error::InvalidAmount("The amount must be a number.".to_owned()));
    }

    let cents = (dollars * 100.0).round();

    if cents < 1.0 {
        return Err(Error::InvalidAmount(
            "The amount must be at least one cent.".to_owned(),
        ));
    }

    if cents > MAX_AMOUNT_CENTS as f64 {
        return Err(Error::InvalidAmount(
            "The amount must be at most $1,000,000,000,000.00.".to_owned(),
        ));
    }

    Ok(cents as i64)
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// The user table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT,
                amount INTEGER NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('credit', 'debit')),
                account TEXT NOT NULL,
                bucket TEXT NOT NULL,
                description TEXT NOT NULL,
                user_id TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Insert `new_transaction` and return the stored row.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// e.g. the user does not exist.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, amount, type, account, bucket, description, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, date, amount, type, account, bucket, description, user_id",
        )?
        .query_row(
            (
                new_transaction.date,
                new_transaction.amount,
                new_transaction.type_,
                new_transaction.account,
                new_transaction.bucket,
                new_transaction.description,
                new_transaction.user_id.as_str(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction owned by `user_id` in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, date, amount, type, account, bucket, description, user_id
         FROM \"transaction\" WHERE user_id = :user_id ORDER BY id",
    )?;

    statement
        .query_map(
            named_params! { ":user_id": user_id.as_str() },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete the transaction `id` if it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if no transaction with `id` belongs to `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_str()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_user_id: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        type_: row.get(3)?,
        account: row.get(4)?,
        bucket: row.get(5)?,
        description: row.get(6)?,
        user_id: UserId::new(raw_user_id),
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        db::initialize,
        user::{UserId, create_user},
    };

    use super::{
        TransactionType, create_transaction, delete_transaction, get_transactions_for_user,
        test_utils::new_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_user(email: &str, conn: &Connection) -> UserId {
        let email: EmailAddress = email.parse().unwrap();
        create_user(&email, PasswordHash::new_unchecked("hunter2"), conn)
            .unwrap()
            .id
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let user_id = create_test_user("jane@example.com", &conn);

        let transaction = create_transaction(
            new_transaction(1234, TransactionType::Debit, "food", &user_id),
            &conn,
        )
        .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, 1234);
        assert_eq!(transaction.type_, TransactionType::Debit);
        assert_eq!(transaction.bucket, "food");
        assert_eq!(transaction.user_id, user_id);
    }

    #[test]
    fn create_accepts_missing_date() {
        let conn = get_test_connection();
        let user_id = create_test_user("jane@example.com", &conn);
        let mut undated = new_transaction(500, TransactionType::Credit, "pay", &user_id);
        undated.date = None;

        let transaction = create_transaction(undated, &conn).unwrap();

        assert_eq!(transaction.date, None);
    }

    #[test]
    fn create_fails_for_unknown_user() {
        let conn = get_test_connection();

        let result = create_transaction(
            new_transaction(1, TransactionType::Debit, "food", &UserId::new("ghost")),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn list_only_returns_rows_for_the_user_in_insertion_order() {
        let conn = get_test_connection();
        let jane = create_test_user("jane@example.com", &conn);
        let john = create_test_user("john@example.com", &conn);
        let first =
            create_transaction(new_transaction(1, TransactionType::Debit, "a", &jane), &conn)
                .unwrap();
        create_transaction(new_transaction(2, TransactionType::Debit, "b", &john), &conn)
            .unwrap();
        let third =
            create_transaction(new_transaction(3, TransactionType::Credit, "c", &jane), &conn)
                .unwrap();

        let got = get_transactions_for_user(&jane, &conn).unwrap();

        assert_eq!(got, vec![first, third]);
    }

    #[test]
    fn delete_removes_row() {
        let conn = get_test_connection();
        let jane = create_test_user("jane@example.com", &conn);
        let transaction =
            create_transaction(new_transaction(1, TransactionType::Debit, "a", &jane), &conn)
                .unwrap();

        delete_transaction(transaction.id, &jane, &conn).unwrap();

        assert_eq!(get_transactions_for_user(&jane, &conn).unwrap(), vec![]);
    }

    #[test]
    fn delete_cannot_touch_another_users_row() {
        let conn = get_test_connection();
        let jane = create_test_user("jane@example.com", &conn);
        let john = create_test_user("john@example.com", &conn);
        let transaction =
            create_transaction(new_transaction(1, TransactionType::Debit, "a", &jane), &conn)
                .unwrap();

        let result = delete_transaction(transaction.id, &john, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
        assert_eq!(get_transactions_for_user(&jane, &conn).unwrap().len(), 1);
    }
}
