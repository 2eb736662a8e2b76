//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for the simulated home date and event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a user-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-01-31T08:30:00Z`) or the SQL-style
/// `YYYY-MM-DD HH:MM:SS[.fraction]`, which is read as UTC.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when neither format matches.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, ValidationError> {
    let trimmed = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.to_utc());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ValidationError::InvalidTimestamp(input.to_string()))
}
