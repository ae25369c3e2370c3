//! Dashboard module
//!
//! Serves the transaction listing and the monthly reports: statistics, the
//! price bar chart and the category pie chart.

mod aggregation;
mod charts;
mod handlers;

pub use handlers::{get_bar_chart, get_combined, get_pie_chart, get_statistics, get_transactions};
