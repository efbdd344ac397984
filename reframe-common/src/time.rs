//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Long display date, e.g. `October 19, 2026`
pub fn long_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// Short display date, e.g. `Oct 19, 2026`
pub fn short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// Fixed-width RFC 3339 form used for `created_at` columns.
///
/// Fixed width keeps lexical order equal to chronological order, so
/// `ORDER BY created_at` sorts correctly on the TEXT column.
pub fn to_db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a `created_at` column back into a UTC timestamp
pub fn from_db_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp '{}': {}", value, e)))
}
