//! Database ID type definitions.

/// Alias for the integer type the transaction store assigns to new rows.
pub type TransactionId = i64;
