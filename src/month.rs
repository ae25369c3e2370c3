//! Resolving the `month` query parameter to a calendar month.

use time::Month;

use crate::Error;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Resolve `text` to a calendar month.
///
/// Accepts, ignoring case and surrounding whitespace:
/// - full English month names, e.g. "January",
/// - three-letter abbreviations, e.g. "jan",
/// - month numbers from 1 to 12, e.g. "3" or "03".
///
/// # Errors
/// Returns [Error::MonthRequired] if `text` is blank, or
/// [Error::InvalidMonth] if it does not name a month.
pub fn parse_month(text: &str) -> Result<Month, Error> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(Error::MonthRequired);
    }

    if let Ok(number) = trimmed.parse::<u8>() {
        return Month::try_from(number).map_err(|_| Error::InvalidMonth(text.to_owned()));
    }

    let lowercase = trimmed.to_lowercase();

    MONTHS
        .into_iter()
        .find(|month| {
            let name = month.to_string().to_lowercase();
            name == lowercase || (lowercase.len() == 3 && name.starts_with(&lowercase))
        })
        .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
}

/// Resolve an optional `month` query parameter.
///
/// # Errors
/// Returns [Error::MonthRequired] if `month` is missing or blank, or
/// [Error::InvalidMonth] if it does not name a month.
pub fn require_month(month: Option<&str>) -> Result<Month, Error> {
    match month {
        Some(month) => parse_month(month),
        None => Err(Error::MonthRequired),
    }
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::Error;

    use super::{parse_month, require_month};

    #[test]
    fn parses_full_names_ignoring_case() {
        assert_eq!(parse_month("January"), Ok(Month::January));
        assert_eq!(parse_month("march"), Ok(Month::March));
        assert_eq!(parse_month("DECEMBER"), Ok(Month::December));
        assert_eq!(parse_month("  September "), Ok(Month::September));
    }

    #[test]
    fn parses_abbreviations() {
        assert_eq!(parse_month("Jan"), Ok(Month::January));
        assert_eq!(parse_month("sep"), Ok(Month::September));
        assert_eq!(parse_month("NOV"), Ok(Month::November));
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_month("1"), Ok(Month::January));
        assert_eq!(parse_month("06"), Ok(Month::June));
        assert_eq!(parse_month("12"), Ok(Month::December));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        assert_eq!(parse_month("0"), Err(Error::InvalidMonth("0".to_owned())));
        assert_eq!(parse_month("13"), Err(Error::InvalidMonth("13".to_owned())));
        assert_eq!(
            parse_month("-1"),
            Err(Error::InvalidMonth("-1".to_owned()))
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            parse_month("Smarch"),
            Err(Error::InvalidMonth("Smarch".to_owned()))
        );
        // Prefixes other than the three-letter abbreviation are ambiguous.
        assert_eq!(parse_month("Ju"), Err(Error::InvalidMonth("Ju".to_owned())));
        assert_eq!(
            parse_month("Janu"),
            Err(Error::InvalidMonth("Janu".to_owned()))
        );
    }

    #[test]
    fn blank_month_is_required() {
        assert_eq!(parse_month(""), Err(Error::MonthRequired));
        assert_eq!(parse_month("   "), Err(Error::MonthRequired));
        assert_eq!(require_month(None), Err(Error::MonthRequired));
    }
}
