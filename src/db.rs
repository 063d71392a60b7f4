//! Sets up the application database.

use rusqlite::Connection;

use crate::{
    Error, auth::create_auth_session_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create all the tables used by the application.
///
/// Foreign key enforcement is switched on for `connection`, since ownership
/// of transactions and auth sessions relies on it. Tables that already exist
/// are left as is.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_auth_session_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
