//! The API endpoints URIs.

/// The root route which greets the client.
pub const ROOT: &str = "/";
/// The route that replaces the database contents with the seed dataset.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing and searching transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the category distribution of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for the statistics, bar chart and pie chart of a month together.
pub const COMBINED: &str = "/combined";
