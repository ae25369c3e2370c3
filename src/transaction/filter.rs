//! Typed predicates over transactions and their translation to SQL.

use rusqlite::types::Value;
use time::Month;

use crate::db::FOLD_FUNCTION;

/// A text column that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// The product name.
    Title,
    /// The product description.
    Description,
}

impl TextField {
    fn column(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Description => "description",
        }
    }
}

/// A numeric column that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    /// The listed price.
    Price,
}

impl NumericField {
    pub(super) fn column(self) -> &'static str {
        match self {
            NumericField::Price => "price",
        }
    }
}

/// A column that transactions can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    /// Group by product category.
    Category,
}

impl GroupField {
    pub(super) fn expression(self) -> &'static str {
        match self {
            GroupField::Category => "category",
        }
    }
}

/// A predicate that selects transactions.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every transaction.
    All,
    /// The sale happened in the given calendar month of any year.
    SaleMonth(Month),
    /// The sold flag equals the given value.
    Sold(bool),
    /// The price is in the half-open range `[min, max)`, or at least `min`
    /// when `max` is `None`.
    PriceRange {
        /// The inclusive lower bound.
        min: f64,
        /// The exclusive upper bound.
        max: Option<f64>,
    },
    /// The price equals the given value exactly.
    PriceEquals(f64),
    /// The text field contains `text`, ignoring case.
    TextContains {
        /// The column to search.
        field: TextField,
        /// The text to look for.
        text: String,
    },
    /// Every inner filter matches. An empty list matches everything.
    And(Vec<Filter>),
    /// At least one inner filter matches. An empty list matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    /// Transactions sold in `month` with the given sold status.
    pub fn month_and_sold(month: Month, sold: bool) -> Self {
        Filter::And(vec![Filter::SaleMonth(month), Filter::Sold(sold)])
    }

    /// Transactions sold in `month` priced within `[min, max)`.
    pub fn month_and_price(month: Month, min: f64, max: Option<f64>) -> Self {
        Filter::And(vec![
            Filter::SaleMonth(month),
            Filter::PriceRange { min, max },
        ])
    }

    /// Build an SQL boolean expression for this filter.
    ///
    /// Values are bound through anonymous `?` placeholders which are pushed
    /// onto `params` in the order they appear in the returned string.
    pub(super) fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Filter::All => "1".to_owned(),
            Filter::SaleMonth(month) => {
                params.push(Value::Integer(u8::from(*month).into()));
                "sale_month = ?".to_owned()
            }
            Filter::Sold(sold) => {
                params.push(Value::Integer((*sold).into()));
                "sold = ?".to_owned()
            }
            Filter::PriceRange { min, max } => {
                params.push(Value::Real(*min));

                match max {
                    Some(max) => {
                        params.push(Value::Real(*max));
                        "(price >= ? AND price < ?)".to_owned()
                    }
                    None => "price >= ?".to_owned(),
                }
            }
            Filter::PriceEquals(price) => {
                params.push(Value::Real(*price));
                "price = ?".to_owned()
            }
            Filter::TextContains { field, text } => {
                params.push(Value::Text(text.clone()));
                format!(
                    "instr({FOLD_FUNCTION}({}), {FOLD_FUNCTION}(?)) > 0",
                    field.column()
                )
            }
            Filter::And(filters) => join_filters(filters, " AND ", "1", params),
            Filter::Or(filters) => join_filters(filters, " OR ", "0", params),
        }
    }
}

fn join_filters(
    filters: &[Filter],
    separator: &str,
    empty: &str,
    params: &mut Vec<Value>,
) -> String {
    if filters.is_empty() {
        return empty.to_owned();
    }

    let parts: Vec<String> = filters.iter().map(|filter| filter.to_sql(params)).collect();

    format!("({})", parts.join(separator))
}

/// The search box on the transactions listing.
///
/// A search matches transactions whose title or description contains the
/// text, or whose price equals the text read as a number.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    /// The text to look for in titles and descriptions.
    pub text: Option<String>,
    /// The exact price to look for.
    pub price: Option<f64>,
}

impl SearchQuery {
    /// Build a search from the raw `search` query parameter.
    ///
    /// A missing or blank search matches everything. Otherwise the text is
    /// matched as given, surrounding whitespace included.
    pub fn new(search: Option<&str>) -> Self {
        let Some(text) = search.filter(|text| !text.trim().is_empty()) else {
            return Self::default();
        };

        let price = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite());

        Self {
            text: Some(text.to_owned()),
            price,
        }
    }

    /// The filter that selects the transactions matching this search.
    pub fn to_filter(&self) -> Filter {
        let Some(text) = &self.text else {
            return match self.price {
                Some(price) => Filter::PriceEquals(price),
                None => Filter::All,
            };
        };

        let mut filters = vec![
            Filter::TextContains {
                field: TextField::Title,
                text: text.clone(),
            },
            Filter::TextContains {
                field: TextField::Description,
                text: text.clone(),
            },
        ];

        if let Some(price) = self.price {
            filters.push(Filter::PriceEquals(price));
        }

        Filter::Or(filters)
    }
}
