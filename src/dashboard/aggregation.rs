//! Monthly reports over the stored transactions.
//!
//! Every report is built from [TransactionStore] queries. Store queries block
//! on SQLite, so they run on tokio's blocking thread pool and independent
//! queries run concurrently.

use serde::Serialize;
use time::Month;
use tokio::task::{JoinError, JoinSet};

use crate::{
    Error,
    pagination::Pagination,
    transaction::{
        Filter, GroupField, NumericField, SearchQuery, TransactionPage, TransactionStore,
    },
};

use super::charts::{CategoryCount, PRICE_BUCKETS, PriceRangeCount};

/// Sales totals for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every transaction in the month, sold or not.
    pub total_sale_amount: f64,
    /// The number of transactions in the month that were sold.
    pub total_sold_items: u64,
    /// The number of transactions in the month that were not sold.
    pub total_not_sold_items: u64,
}

/// The statistics, bar chart and pie chart for a month in one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// See [Dashboard::statistics].
    pub statistics: Statistics,
    /// See [Dashboard::histogram].
    pub bar_chart: Vec<PriceRangeCount>,
    /// See [Dashboard::distribution].
    pub pie_chart: Vec<CategoryCount>,
}

/// Builds the listing and the monthly reports from a transaction store.
#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    store: S,
}

impl<S> Dashboard<S>
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    /// Create a dashboard that reads from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run a store query on the blocking thread pool.
    async fn query<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: FnOnce(&S) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();

        tokio::task::spawn_blocking(move || query(&store))
            .await
            .map_err(task_failed)?
    }

    /// Get a page of transactions matching `search`, along with the total
    /// number of matches.
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn list_transactions(
        &self,
        search: SearchQuery,
        pagination: Pagination,
    ) -> Result<TransactionPage, Error> {
        self.query(move |store| store.search_paginated(&search, pagination))
            .await
    }

    /// Get the sales totals for `month`.
    ///
    /// The total sale amount includes every transaction in the month, not just
    /// the sold ones.
    ///
    /// # Errors
    /// Returns an error if any of the store queries fail.
    pub async fn statistics(&self, month: Month) -> Result<Statistics, Error> {
        let (total_sale_amount, total_sold_items, total_not_sold_items) = tokio::try_join!(
            self.query(move |store| {
                store.sum_matching(&Filter::SaleMonth(month), NumericField::Price)
            }),
            self.query(move |store| store.count_matching(&Filter::month_and_sold(month, true))),
            self.query(move |store| store.count_matching(&Filter::month_and_sold(month, false))),
        )?;

        Ok(Statistics {
            total_sale_amount,
            total_sold_items,
            total_not_sold_items,
        })
    }

    /// Count the transactions in `month` for each of the fixed price buckets.
    ///
    /// The buckets are counted concurrently and returned in bucket order.
    ///
    /// # Errors
    /// Returns an error if any of the store queries fail.
    pub async fn histogram(&self, month: Month) -> Result<Vec<PriceRangeCount>, Error> {
        let mut tasks = JoinSet::new();

        for (index, bucket) in PRICE_BUCKETS.iter().enumerate() {
            let store = self.store.clone();
            let filter = Filter::month_and_price(month, bucket.min, bucket.max);

            tasks.spawn_blocking(move || {
                store
                    .count_matching(&filter)
                    .map(|count| (index, count))
            });
        }

        let mut counts = [0; PRICE_BUCKETS.len()];

        while let Some(result) = tasks.join_next().await {
            let (index, count) = result.map_err(task_failed)??;
            counts[index] = count;
        }

        Ok(PRICE_BUCKETS
            .iter()
            .zip(counts)
            .map(|(bucket, count)| PriceRangeCount {
                range: bucket.label.to_owned(),
                count,
            })
            .collect())
    }

    /// Count the transactions in `month` per category.
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn distribution(&self, month: Month) -> Result<Vec<CategoryCount>, Error> {
        let groups = self
            .query(move |store| {
                store.group_count_by(&Filter::SaleMonth(month), GroupField::Category)
            })
            .await?;

        Ok(groups
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    /// Get the statistics, bar chart and pie chart for `month`.
    ///
    /// The three reports are built concurrently. If any of them fails, the
    /// whole report fails.
    ///
    /// # Errors
    /// Returns the first error from the three reports.
    pub async fn combined(&self, month: Month) -> Result<CombinedReport, Error> {
        let (statistics, bar_chart, pie_chart) = tokio::try_join!(
            self.statistics(month),
            self.histogram(month),
            self.distribution(month),
        )?;

        Ok(CombinedReport {
            statistics,
            bar_chart,
            pie_chart,
        })
    }
}

fn task_failed(error: JoinError) -> Error {
    tracing::error!("store query task failed: {error}");
    Error::TaskFailed(error.to_string())
}
