//! Defines the core data models and table for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether it was sold, i.e. one record of the sales catalogue.
///
/// Transactions are only ever created in bulk from the seed dataset, see
/// [NewTransaction].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The category the product belongs to, e.g. "electronics".
    pub category: String,
    /// A URL pointing to an image of the product.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the sale happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            image: String::new(),
            sold: false,
            date_of_sale,
        }
    }
}

/// A transaction that has not been stored yet.
///
/// This is also the shape of a record in the seed dataset. Any `id` field in
/// the seed document is ignored since the database assigns IDs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The category the product belongs to.
    pub category: String,
    /// A URL pointing to an image of the product.
    #[serde(default)]
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the sale happened. Any UTC offset is accepted, the stored value is
    /// converted to UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl NewTransaction {
    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category of the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the image URL of the transaction.
    #[cfg(test)]
    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the transaction table in the order [map_transaction_row] expects.
pub(super) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, image, sold, date_of_sale";

/// Insert `transaction` into the database.
///
/// The month of the sale is derived from the UTC date and stored alongside it
/// so that month filters do not depend on SQLite's date functions.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub(super) fn insert_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let date_of_sale = transaction.date_of_sale.to_offset(UtcOffset::UTC);

    connection
        .prepare_cached(
            "INSERT INTO \"transaction\" \
            (title, description, price, category, image, sold, date_of_sale, sale_month)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?
        .execute((
            &transaction.title,
            &transaction.description,
            transaction.price,
            &transaction.category,
            &transaction.image,
            transaction.sold,
            date_of_sale,
            u8::from(date_of_sale.month()),
        ))?;

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER NOT NULL CHECK (sale_month BETWEEN 1 AND 12)
                )",
        (),
    )?;

    // Add composite index used by the monthly reports.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_month_price ON \"transaction\"(sale_month, price);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
