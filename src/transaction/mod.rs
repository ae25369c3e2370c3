//! Transaction storage for the sales catalogue.
//!
//! This module contains everything related to stored transactions:
//! - The `Transaction` model and the `NewTransaction` seed record
//! - Typed filters that select transactions
//! - The `TransactionStore` trait and its SQLite implementation

mod core;
mod filter;
mod store;

pub use core::{NewTransaction, create_transaction_table};
pub use filter::{Filter, GroupField, NumericField, SearchQuery};
pub use store::{SQLiteTransactionStore, TransactionPage, TransactionStore};

#[cfg(test)]
pub use core::{Transaction, count_transactions};
