//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error,
    dashboard::{get_bar_chart, get_combined, get_pie_chart, get_statistics, get_transactions},
    endpoints,
    seed::get_initialize,
};

/// The text served at the root route.
const GREETING: &str = "Welcome to Roxiler API!";

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::INITIALIZE, get(get_initialize))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(endpoints::BAR_CHART, get(get_bar_chart))
        .route(endpoints::PIE_CHART, get(get_pie_chart))
        .route(endpoints::COMBINED, get(get_combined))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The root path '/' greets the client.
async fn get_root() -> &'static str {
    GREETING
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
