//! Fetches the seed dataset over HTTP and loads it into a transaction store.

use std::time::Duration;

use crate::{
    Error,
    transaction::{NewTransaction, TransactionStore},
};

/// Where the product transaction dataset is published.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Fetches the seed dataset, a JSON array of [NewTransaction] records.
#[derive(Debug, Clone)]
pub struct SeedClient {
    client: reqwest::Client,
    url: String,
}

impl SeedClient {
    /// Create a client for the dataset at `url`.
    ///
    /// Requests that take longer than `timeout` fail.
    ///
    /// # Errors
    /// Returns [Error::SeedSourceUnavailable] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::SeedSourceUnavailable(error.to_string()))?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// The URL the dataset is fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the seed dataset.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::SeedSourceUnavailable] if the request fails or the server
    ///   responds with an error status,
    /// - or [Error::InvalidSeedData] if the response is not a list of transactions.
    pub async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        let response = self.client.get(&self.url).send().await.map_err(|error| {
            tracing::error!("could not reach the seed source {}: {error}", self.url);
            Error::SeedSourceUnavailable(error.to_string())
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "the seed source {} responded with {status}\nbody: {body:?}",
                self.url
            );
            return Err(Error::SeedSourceUnavailable(format!("{status}: {body}")));
        }

        response
            .json::<Vec<NewTransaction>>()
            .await
            .map_err(|error| {
                tracing::error!("could not read the seed dataset from {}: {error}", self.url);

                if error.is_decode() {
                    Error::InvalidSeedData(error.to_string())
                } else {
                    Error::SeedSourceUnavailable(error.to_string())
                }
            })
    }
}

/// Replace the contents of `store` with the seed dataset.
///
/// The dataset is downloaded before the store is touched, so a failed
/// download leaves the store as it was.
///
/// Returns the number of transactions stored.
///
/// # Errors
/// Returns an error if the dataset cannot be fetched or stored.
pub async fn seed_database<S>(client: &SeedClient, store: S) -> Result<usize, Error>
where
    S: TransactionStore + Send + 'static,
{
    let transactions = client.fetch().await?;
    tracing::debug!(
        "Fetched {} transactions from {}",
        transactions.len(),
        client.url()
    );

    tokio::task::spawn_blocking(move || store.replace_all(transactions))
        .await
        .map_err(|error| {
            tracing::error!("seeding task failed: {error}");
            Error::TaskFailed(error.to_string())
        })?
}
