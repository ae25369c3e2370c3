//! The transaction store: the only part of the application that touches the
//! transaction table.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Serialize;

use crate::{Error, pagination::Pagination};

use super::{
    core::{
        NewTransaction, TRANSACTION_COLUMNS, Transaction, insert_transaction, map_transaction_row,
    },
    filter::{Filter, GroupField, NumericField, SearchQuery},
};

/// A page of transactions from a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// The transactions on the requested page, in insertion order.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the search across all pages.
    pub total: u64,
}

/// Query primitives over the stored transactions.
pub trait TransactionStore {
    /// Count the transactions matching `filter`.
    fn count_matching(&self, filter: &Filter) -> Result<u64, Error>;

    /// Sum `field` over the transactions matching `filter`.
    ///
    /// Implementers should return zero when no transactions match.
    fn sum_matching(&self, filter: &Filter, field: NumericField) -> Result<f64, Error>;

    /// Get one page of the transactions matching `search`, in insertion order,
    /// along with the total number of matches.
    fn search_paginated(
        &self,
        search: &SearchQuery,
        pagination: Pagination,
    ) -> Result<TransactionPage, Error>;

    /// Count the transactions matching `filter` for each distinct value of `field`.
    ///
    /// Groups are ordered by key.
    fn group_count_by(
        &self,
        filter: &Filter,
        field: GroupField,
    ) -> Result<Vec<(String, u64)>, Error>;

    /// Replace every stored transaction with `transactions`.
    ///
    /// Implementers must make the replacement atomic: readers see either the
    /// old or the new dataset.
    ///
    /// Returns the number of transactions stored.
    fn replace_all(&self, transactions: Vec<NewTransaction>) -> Result<usize, Error>;
}

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The transaction table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::StoreUnavailable)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Count the transactions matching `filter`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreUnavailable] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn count_matching(&self, filter: &Filter) -> Result<u64, Error> {
        let mut params = Vec::new();
        let query = format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {}",
            filter.to_sql(&mut params)
        );

        let count: i64 = self
            .lock()?
            .prepare(&query)?
            .query_row(params_from_iter(params), |row| row.get(0))?;

        Ok(count as u64)
    }

    /// Sum `field` over the transactions matching `filter`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreUnavailable] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn sum_matching(&self, filter: &Filter, field: NumericField) -> Result<f64, Error> {
        let mut params = Vec::new();
        let query = format!(
            "SELECT COALESCE(SUM({}), 0.0) FROM \"transaction\" WHERE {}",
            field.column(),
            filter.to_sql(&mut params)
        );

        self.lock()?
            .prepare(&query)?
            .query_row(params_from_iter(params), |row| row.get(0))
            .map_err(|error| error.into())
    }

    /// Get one page of the transactions matching `search`.
    ///
    /// The page and the total are read while holding the lock, so they always
    /// describe the same dataset.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreUnavailable] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn search_paginated(
        &self,
        search: &SearchQuery,
        pagination: Pagination,
    ) -> Result<TransactionPage, Error> {
        let mut params = Vec::new();
        let where_clause = search.to_filter().to_sql(&mut params);
        let count_params = params.clone();

        let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
        let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        let connection = self.lock()?;

        let transactions = connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {where_clause} \
                ORDER BY id ASC LIMIT ? OFFSET ?"
            ))?
            .query_map(params_from_iter(params), map_transaction_row)?
            .map(|transaction_result| transaction_result.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = connection
            .prepare(&format!(
                "SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"
            ))?
            .query_row(params_from_iter(count_params), |row| row.get(0))?;

        Ok(TransactionPage {
            transactions,
            total: total as u64,
        })
    }

    /// Count the transactions matching `filter` per distinct `field` value.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreUnavailable] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn group_count_by(
        &self,
        filter: &Filter,
        field: GroupField,
    ) -> Result<Vec<(String, u64)>, Error> {
        let mut params = Vec::new();
        let query = format!(
            "SELECT {} AS group_key, COUNT(id) FROM \"transaction\" WHERE {} \
            GROUP BY group_key ORDER BY group_key ASC",
            field.expression(),
            filter.to_sql(&mut params)
        );

        self.lock()?
            .prepare(&query)?
            .query_map(params_from_iter(params), |row| {
                let key: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((key, count as u64))
            })?
            .map(|group_result| group_result.map_err(Error::SqlError))
            .collect()
    }

    /// Replace every stored transaction with `transactions` in a single
    /// database transaction.
    ///
    /// The lock is held for the whole replacement, so no reader can observe a
    /// half-seeded table. On error nothing is changed.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreUnavailable] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn replace_all(&self, transactions: Vec<NewTransaction>) -> Result<usize, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let deleted = tx.execute("DELETE FROM \"transaction\"", ())?;
        tracing::debug!("Deleted {deleted} transactions");

        for transaction in &transactions {
            insert_transaction(transaction, &tx)?;
        }

        tx.commit()?;

        Ok(transactions.len())
    }
}
