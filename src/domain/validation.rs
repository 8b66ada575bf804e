//! Parsing helpers shared by the entity drafts.
//!
//! Form input arrives as raw text. Every helper either yields a typed value or
//! a [`FinanceError::Validation`] naming the offending field; nothing is ever
//! defaulted to zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{FinanceError, FinanceResult};

/// Trims `raw` and rejects blank input.
pub fn require_text(field: &str, raw: &str) -> FinanceResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trims `raw`, mapping blank input to `None`.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parses a finite decimal number.
pub fn parse_number(field: &str, raw: &str) -> FinanceResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(field, "is required"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| FinanceError::validation(field, format!("`{}` is not a number", trimmed)))?;
    if !value.is_finite() {
        return Err(FinanceError::validation(field, "must be a finite number"));
    }
    Ok(value)
}

pub fn parse_non_negative(field: &str, raw: &str) -> FinanceResult<f64> {
    let value = parse_number(field, raw)?;
    if value < 0.0 {
        return Err(FinanceError::validation(field, "must not be negative"));
    }
    Ok(value)
}

pub fn parse_positive(field: &str, raw: &str) -> FinanceResult<f64> {
    let value = parse_number(field, raw)?;
    if value <= 0.0 {
        return Err(FinanceError::validation(field, "must be greater than zero"));
    }
    Ok(value)
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, raw: &str) -> FinanceResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(field, "is required"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| FinanceError::validation(field, format!("`{}` is not a valid date", trimmed)))
}

/// Parses an instant. Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`
/// timestamp (read as UTC) or a bare date (midnight UTC).
pub fn parse_instant(field: &str, raw: &str) -> FinanceResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(field, "is required"));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(FinanceError::validation(
        field,
        format!("`{}` is not a valid timestamp", trimmed),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_amount_is_rejected_not_zeroed() {
        let err = parse_non_negative("amount", "12abc").unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn blank_number_is_required() {
        let err = parse_number("balance", "   ").unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn infinite_numbers_are_rejected() {
        assert!(parse_number("amount", "inf").is_err());
        assert!(parse_number("amount", "NaN").is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(parse_positive("targetAmount", "0").is_err());
        assert_eq!(parse_positive("targetAmount", "10000").unwrap(), 10000.0);
    }

    #[test]
    fn instants_accept_several_layouts() {
        let a = parse_instant("date", "2023-05-28T10:30:00").unwrap();
        let b = parse_instant("date", "2023-05-28T10:30:00Z").unwrap();
        assert_eq!(a, b);
        let c = parse_instant("date", "2023-05-28").unwrap();
        assert!(c < a);
        assert!(parse_instant("date", "yesterday").is_err());
    }

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" note ")), Some("note".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
