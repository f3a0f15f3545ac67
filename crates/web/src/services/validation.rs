//! Form field parsing shared by the booking and ledger flows.

use chrono::NaiveDate;

/// Message for a missing date field.
pub const DATE_REQUIRED: &str = "Event Date is required.";

/// Message for a date field that is not `YYYY-MM-DD`.
pub const DATE_INVALID: &str = "Event Date must be a valid date (YYYY-MM-DD).";

/// Parse a strictly positive integer made only of ASCII digits.
///
/// Signs, whitespace inside the number, and decimals are rejected, so
/// `"+3"`, `"1.0"` and `"0"` are all `None`.
#[must_use]
pub fn positive_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|n| *n > 0)
}

/// Parse a calendar date field.
///
/// # Errors
///
/// Returns [`DATE_REQUIRED`] for blank input and [`DATE_INVALID`] for anything
/// that is not a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DATE_REQUIRED);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DATE_INVALID)
}

/// Push `message` when `value` is blank.
pub fn require(value: &str, message: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_int() {
        assert_eq!(positive_int("3"), Some(3));
        assert_eq!(positive_int(" 12 "), Some(12));
        assert_eq!(positive_int("0"), None);
        assert_eq!(positive_int("-1"), None);
        assert_eq!(positive_int("+4"), None);
        assert_eq!(positive_int("2.5"), None);
        assert_eq!(positive_int(""), None);
        assert_eq!(positive_int("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2030-05-01"),
            Ok(NaiveDate::from_ymd_opt(2030, 5, 1).unwrap_or_default())
        );
        assert_eq!(parse_date("  "), Err(DATE_REQUIRED));
        assert_eq!(parse_date("01/05/2030"), Err(DATE_INVALID));
        assert_eq!(parse_date("2030-02-30"), Err(DATE_INVALID));
    }

    #[test]
    fn test_require() {
        let mut errors = Vec::new();
        require("Gala", "Event Name is required.", &mut errors);
        require(" ", "Location is required.", &mut errors);
        assert_eq!(errors, vec!["Location is required.".to_string()]);
    }
}
