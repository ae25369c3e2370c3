//! The route handler that reseeds the database.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, transaction::SQLiteTransactionStore};

use super::client::{SeedClient, seed_database};

/// The state needed to reseed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The store to replace the contents of.
    pub transaction_store: SQLiteTransactionStore,
    /// The client for fetching the seed dataset.
    pub seed_client: SeedClient,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            seed_client: state.seed_client.clone(),
        }
    }
}

/// Replace every transaction in the database with the seed dataset.
pub async fn get_initialize(State(state): State<SeedState>) -> Response {
    match seed_database(&state.seed_client, state.transaction_store).await {
        Ok(count) => {
            tracing::info!("Seeded the database with {count} transactions");
            (StatusCode::OK, "Database initialized with seed data").into_response()
        }
        Err(error) => error.into_response_with_message("Error initializing database"),
    }
}
