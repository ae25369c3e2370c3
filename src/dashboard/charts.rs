//! Data shapes for the bar chart (price histogram) and pie chart (category
//! distribution).

use serde::Serialize;

/// A fixed price range of the bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PriceBucket {
    /// The label shown for the bucket, e.g. "101-200".
    pub label: &'static str,
    /// The inclusive lower bound.
    pub min: f64,
    /// The exclusive upper bound, `None` for the last bucket.
    pub max: Option<f64>,
}

/// The bar chart buckets, in display order.
///
/// Each bucket after the first starts one unit above the previous bucket's
/// upper bound, so prices in `[100, 101)`, `[200, 201)`, ... `[900, 901)`
/// are not counted by any bucket.
pub(super) const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket {
        label: "0-100",
        min: 0.0,
        max: Some(100.0),
    },
    PriceBucket {
        label: "101-200",
        min: 101.0,
        max: Some(200.0),
    },
    PriceBucket {
        label: "201-300",
        min: 201.0,
        max: Some(300.0),
    },
    PriceBucket {
        label: "301-400",
        min: 301.0,
        max: Some(400.0),
    },
    PriceBucket {
        label: "401-500",
        min: 401.0,
        max: Some(500.0),
    },
    PriceBucket {
        label: "501-600",
        min: 501.0,
        max: Some(600.0),
    },
    PriceBucket {
        label: "601-700",
        min: 601.0,
        max: Some(700.0),
    },
    PriceBucket {
        label: "701-800",
        min: 701.0,
        max: Some(800.0),
    },
    PriceBucket {
        label: "801-900",
        min: 801.0,
        max: Some(900.0),
    },
    PriceBucket {
        label: "901-above",
        min: 901.0,
        max: None,
    },
];

/// The number of transactions in one bar chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRangeCount {
    /// The bucket label, e.g. "101-200".
    pub range: String,
    /// The number of transactions priced within the bucket.
    pub count: u64,
}

/// The number of transactions in one category of the pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// The category name.
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}
