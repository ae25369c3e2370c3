//! Dashboard HTTP handlers.
//!
//! Each handler parses the query string, asks the [Dashboard] for a report
//! and serializes it as JSON. Client mistakes are answered with 400 and a
//! message saying what to fix, every other failure with 500 and a generic
//! message.

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Month;

use crate::{
    AppState,
    month::require_month,
    pagination::{Pagination, PaginationConfig},
    transaction::{SQLiteTransactionStore, SearchQuery, TransactionPage},
};

use super::{
    aggregation::{CombinedReport, Dashboard, Statistics},
    charts::{CategoryCount, PriceRangeCount},
};

/// The state needed for the listing and report handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Builds the reports from the transaction store.
    pub dashboard: Dashboard<SQLiteTransactionStore>,
    /// The default page and page size for the listing.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            dashboard: Dashboard::new(state.transaction_store.clone()),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Query parameters for the transaction listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Text to look for in titles and descriptions, or a price.
    pub search: Option<String>,
    /// The 1-indexed page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub per_page: Option<String>,
}

/// Query parameters for the monthly reports.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// A month name, abbreviation or number.
    pub month: Option<String>,
}

impl MonthQuery {
    fn month(&self) -> Result<Month, Response> {
        require_month(self.month.as_deref()).map_err(IntoResponse::into_response)
    }
}

/// List transactions, optionally filtered by a search, one page at a time.
pub async fn get_transactions(
    State(state): State<DashboardState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionPage>, Response> {
    let pagination = Pagination::from_query(
        query.page.as_deref(),
        query.per_page.as_deref(),
        &state.pagination_config,
    )
    .map_err(IntoResponse::into_response)?;

    state
        .dashboard
        .list_transactions(SearchQuery::new(query.search.as_deref()), pagination)
        .await
        .map(Json)
        .map_err(|error| error.into_response_with_message("Error fetching transactions"))
}

/// Get the sales totals for a month.
pub async fn get_statistics(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Response> {
    let month = query.month()?;

    state
        .dashboard
        .statistics(month)
        .await
        .map(Json)
        .map_err(|error| error.into_response_with_message("Error fetching statistics"))
}

/// Get the price histogram for a month.
pub async fn get_bar_chart(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, Response> {
    let month = query.month()?;

    state
        .dashboard
        .histogram(month)
        .await
        .map(Json)
        .map_err(|error| error.into_response_with_message("Error fetching bar chart data"))
}

/// Get the category distribution for a month.
pub async fn get_pie_chart(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Response> {
    let month = query.month()?;

    state
        .dashboard
        .distribution(month)
        .await
        .map(Json)
        .map_err(|error| error.into_response_with_message("Error fetching pie chart data"))
}

/// Get the statistics, bar chart and pie chart for a month in one response.
pub async fn get_combined(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedReport>, Response> {
    let month = query.month()?;

    state
        .dashboard
        .combined(month)
        .await
        .map(Json)
        .map_err(|error| error.into_response_with_message("Error fetching combined data"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        endpoints,
        pagination::PaginationConfig,
        test_utils::{get_test_connection, get_test_store},
        transaction::{NewTransaction, SQLiteTransactionStore, Transaction},
    };

    use super::{
        Dashboard, DashboardState, get_bar_chart, get_combined, get_pie_chart, get_statistics,
        get_transactions,
    };

    fn dashboard_router(state: DashboardState) -> Router {
        Router::new()
            .route(endpoints::TRANSACTIONS, get(get_transactions))
            .route(endpoints::STATISTICS, get(get_statistics))
            .route(endpoints::BAR_CHART, get(get_bar_chart))
            .route(endpoints::PIE_CHART, get(get_pie_chart))
            .route(endpoints::COMBINED, get(get_combined))
            .with_state(state)
    }

    fn get_test_server(transactions: Vec<NewTransaction>) -> TestServer {
        let state = DashboardState {
            dashboard: Dashboard::new(get_test_store(transactions)),
            pagination_config: PaginationConfig::default(),
        };

        TestServer::new(dashboard_router(state))
    }

    fn january_example() -> Vec<NewTransaction> {
        vec![
            Transaction::build("A", 50.0, datetime!(2022-01-10 0:00 UTC))
                .category("A")
                .sold(true),
            Transaction::build("B", 150.0, datetime!(2021-01-10 0:00 UTC)).category("B"),
        ]
    }

    #[tokio::test]
    async fn statistics_requires_month() {
        let server = get_test_server(vec![]);

        let response = server.get(endpoints::STATISTICS).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Month is required");
    }

    #[tokio::test]
    async fn every_report_requires_month() {
        let server = get_test_server(vec![]);

        for endpoint in [
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED,
        ] {
            let response = server.get(endpoint).add_query_param("month", "").await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_text("Month is required");
        }
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let server = get_test_server(vec![]);

        let response = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "Smarch")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Invalid month \"Smarch\"");
    }

    #[tokio::test]
    async fn statistics_returns_json_totals() {
        let server = get_test_server(january_example());

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "January")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalSaleAmount": 200.0,
            "totalSoldItems": 1,
            "totalNotSoldItems": 1,
        }));
    }

    #[tokio::test]
    async fn bar_chart_returns_ten_buckets() {
        let server = get_test_server(january_example());

        let response = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "1")
            .await;

        response.assert_status_ok();
        let buckets = response.json::<Vec<Value>>();
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0], json!({"range": "0-100", "count": 1}));
        assert_eq!(buckets[1], json!({"range": "101-200", "count": 1}));
        assert_eq!(buckets[9], json!({"range": "901-above", "count": 0}));
    }

    #[tokio::test]
    async fn pie_chart_returns_categories() {
        let server = get_test_server(january_example());

        let response = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "jan")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([
            {"category": "A", "count": 1},
            {"category": "B", "count": 1},
        ]));
    }

    #[tokio::test]
    async fn combined_merges_reports() {
        let server = get_test_server(january_example());

        let combined = server
            .get(endpoints::COMBINED)
            .add_query_param("month", "January")
            .await
            .json::<Value>();
        let statistics = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "January")
            .await
            .json::<Value>();
        let bar_chart = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "January")
            .await
            .json::<Value>();
        let pie_chart = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "January")
            .await
            .json::<Value>();

        assert_eq!(
            combined,
            json!({
                "statistics": statistics,
                "barChart": bar_chart,
                "pieChart": pie_chart,
            })
        );
    }

    #[tokio::test]
    async fn transactions_lists_first_page_by_default() {
        let date = datetime!(2022-03-01 0:00 UTC);
        let server = get_test_server(
            (0..15)
                .map(|i| Transaction::build(&format!("item {i}"), i as f64, date))
                .collect(),
        );

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["total"], 15);
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 10);
        assert_eq!(transactions[0]["title"], "item 0");
        assert_eq!(transactions[0]["dateOfSale"], "2022-03-01T00:00:00Z");
    }

    #[tokio::test]
    async fn transactions_supports_search_and_paging() {
        let date = datetime!(2022-03-01 0:00 UTC);
        let server = get_test_server(
            (0..12)
                .map(|i| Transaction::build(&format!("shirt {i}"), i as f64, date))
                .chain([Transaction::build("hat", 3.0, date)])
                .collect(),
        );

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "SHIRT")
            .add_query_param("page", "2")
            .add_query_param("perPage", "5")
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["total"], 12);
        let titles: Vec<_> = body["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["title"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            titles,
            vec!["shirt 5", "shirt 6", "shirt 7", "shirt 8", "shirt 9"]
        );
    }

    #[tokio::test]
    async fn transactions_rejects_bad_page() {
        let server = get_test_server(vec![]);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", "0")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_server_error() {
        let connection = Arc::new(Mutex::new(get_test_connection()));
        let state = DashboardState {
            dashboard: Dashboard::new(SQLiteTransactionStore::new(connection.clone())),
            pagination_config: PaginationConfig::default(),
        };
        let server = TestServer::new(dashboard_router(state));
        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "January")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Error fetching statistics");
    }
}
