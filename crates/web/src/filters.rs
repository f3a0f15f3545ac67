//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an amount with exactly two decimal places.
///
/// Usage in templates: `{{ order.total_price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(raw
        .parse::<rust_decimal::Decimal>()
        .map_or(raw, |amount| format!("{amount:.2}")))
}
