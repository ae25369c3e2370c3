//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a stored transaction, assigned by the database on insert.
pub type TransactionId = DatabaseId;
