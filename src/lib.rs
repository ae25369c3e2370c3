//! Roxiler is a small REST API for exploring a catalogue of product sales.
//!
//! The API seeds its database from a remote JSON dump and serves monthly
//! statistics over the seeded transactions: totals, a price histogram (bar
//! chart) and a category breakdown (pie chart).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod month;
mod pagination;
mod routing;
mod seed;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{close as close_db, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, SeedClient, seed_database};
pub use transaction::{SQLiteTransactionStore, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A route that reports on a month was called without the `month` query
    /// parameter, or with a blank one.
    #[error("Month is required")]
    MonthRequired,

    /// The `month` query parameter could not be resolved to a calendar month.
    ///
    /// Holds the value the client sent.
    #[error("Invalid month \"{0}\"")]
    InvalidMonth(String),

    /// A query parameter other than the month was malformed.
    ///
    /// The string is shown to the client, so it should describe what to fix.
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    StoreUnavailable,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The seed dataset could not be fetched.
    ///
    /// The string holds the transport error, or the upstream status and
    /// response body.
    #[error("could not fetch the seed dataset: {0}")]
    SeedSourceUnavailable(String),

    /// The seed dataset was fetched but is not a list of transactions.
    #[error("the seed dataset is malformed: {0}")]
    InvalidSeedData(String),

    /// A blocking store task panicked or was cancelled.
    #[error("a background task failed: {0}")]
    TaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MonthRequired | Error::InvalidMonth(_) | Error::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into a plain text response, replacing the details of
    /// server-side errors with `message`.
    ///
    /// Client errors keep their own message since it tells the client what
    /// to fix.
    fn into_response_with_message(self, message: &'static str) -> Response {
        match self {
            Error::MonthRequired | Error::InvalidMonth(_) | Error::InvalidRequest(_) => {
                self.into_response()
            }
            error => {
                tracing::error!("{message}: {error}");
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
