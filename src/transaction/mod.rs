//! Transactions: the model and its queries, the repository the page talks to,
//! and the handlers for adding and deleting transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod repository;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction_table, dollars_to_cents,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{
    cancel_delete_endpoint, delete_transaction_endpoint, pending_delete_endpoint,
};
pub use form::add_transaction_form;
pub use repository::{SqliteTransactionRepository, TransactionRepository};

#[cfg(test)]
pub(crate) use core::test_utils;
