//! Query parameter parsing for inbound HTTP adapters.
//!
//! Parameters are accepted as raw strings and parsed here so malformed values
//! produce the same JSON error envelope as every other failure, with the
//! offending field named in `details`.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidNumber,
    NonFiniteNumber,
    BlankPathSegment,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::NonFiniteNumber => "non_finite_number",
            ErrorCode::BlankPathSegment => "blank_path_segment",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Treat absent and whitespace-only values alike.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse an optional integer parameter; blank values count as absent.
pub(crate) fn parse_optional_i64(raw: Option<&str>, field: FieldName) -> Result<Option<i64>, Error> {
    present(raw)
        .map(|value| {
            i64::from_str(value).map_err(|_| {
                invalid_value(
                    field,
                    ErrorCode::InvalidNumber,
                    format!("{} must be an integer", field.as_str()),
                    value,
                )
            })
        })
        .transpose()
}

/// Parse an optional finite decimal parameter; blank values count as absent.
pub(crate) fn parse_optional_f64(raw: Option<&str>, field: FieldName) -> Result<Option<f64>, Error> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    let parsed = f64::from_str(value).map_err(|_| {
        invalid_value(
            field,
            ErrorCode::InvalidNumber,
            format!("{} must be a number", field.as_str()),
            value,
        )
    })?;
    if !parsed.is_finite() {
        return Err(invalid_value(
            field,
            ErrorCode::NonFiniteNumber,
            format!("{} must be finite", field.as_str()),
            value,
        ));
    }
    Ok(Some(parsed))
}

/// Reject path segments that are blank once trimmed.
pub(crate) fn require_path_segment(raw: &str, field: FieldName) -> Result<(), Error> {
    if raw.trim().is_empty() {
        return Err(invalid_value(
            field,
            ErrorCode::BlankPathSegment,
            format!("{} must not be blank", field.as_str()),
            raw,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;

    const LIMIT: FieldName = FieldName::new("limit");
    const MIN_RATING: FieldName = FieldName::new("minRating");

    #[rstest]
    #[case::absent(None, None)]
    #[case::blank(Some("  "), None)]
    #[case::value(Some("5"), Some(5))]
    #[case::negative(Some("-2"), Some(-2))]
    #[case::padded(Some(" 7 "), Some(7))]
    fn parses_optional_integers(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(parse_optional_i64(raw, LIMIT).expect("valid"), expected);
    }

    #[rstest]
    fn malformed_integers_name_the_field() {
        let error = parse_optional_i64(Some("ten"), LIMIT).expect_err("must fail");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "limit", "value": "ten", "code": "invalid_number"}))
        );
    }

    #[rstest]
    #[case::decimal(Some("4.5"), Some(4.5))]
    #[case::integer(Some("3"), Some(3.0))]
    #[case::absent(None, None)]
    fn parses_optional_decimals(#[case] raw: Option<&str>, #[case] expected: Option<f64>) {
        assert_eq!(parse_optional_f64(raw, MIN_RATING).expect("valid"), expected);
    }

    #[rstest]
    #[case::word("high", "invalid_number")]
    #[case::nan("NaN", "non_finite_number")]
    #[case::infinity("inf", "non_finite_number")]
    fn rejects_unusable_decimals(#[case] raw: &str, #[case] code: &str) {
        let error = parse_optional_f64(Some(raw), MIN_RATING).expect_err("must fail");
        assert_eq!(
            error.details().and_then(|details| details.get("code")),
            Some(&json!(code))
        );
    }

    #[rstest]
    fn blank_path_segments_are_rejected() {
        assert!(require_path_segment(" ", FieldName::new("routeId")).is_err());
        assert!(require_path_segment("r1", FieldName::new("routeId")).is_ok());
    }
}
