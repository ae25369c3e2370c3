//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A single page of results.
///
/// Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The page number, starting at 1.
    pub page: u64,
    /// The maximum number of items on a page.
    pub per_page: u64,
}

impl Pagination {
    /// Build a page from the raw `page` and `perPage` query parameters,
    /// falling back to `config` for missing or blank values.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if either value is not a positive integer.
    pub fn from_query(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            page: parse_positive("page", page)?.unwrap_or(config.default_page),
            per_page: parse_positive("perPage", per_page)?.unwrap_or(config.default_page_size),
        })
    }

    /// The number of items to skip to reach this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

fn parse_positive(name: &str, value: Option<&str>) -> Result<Option<u64>, Error> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match value.parse::<u64>() {
        Ok(number) if number > 0 => Ok(Some(number)),
        _ => Err(Error::InvalidRequest(format!(
            "{name} must be a positive integer, got \"{value}\""
        ))),
    }
}
