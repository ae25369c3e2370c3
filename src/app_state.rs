//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, pagination::PaginationConfig, seed::SeedClient,
    transaction::SQLiteTransactionStore,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection.
    ///
    /// Keep a clone of this handle to close the database after the server
    /// shuts down, see [crate::close_db].
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for the seeded transactions.
    pub transaction_store: SQLiteTransactionStore,

    /// The config that controls how to page the transaction listing.
    pub pagination_config: PaginationConfig,

    /// The client for fetching the seed dataset.
    pub seed_client: SeedClient,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        pagination_config: PaginationConfig,
        seed_client: SeedClient,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            transaction_store: SQLiteTransactionStore::new(connection.clone()),
            db_connection: connection,
            pagination_config,
            seed_client,
        })
    }
}
