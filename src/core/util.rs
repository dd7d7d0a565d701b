//! Common utilities

use chrono::{DateTime, Utc};

/// HTTP-date layout (RFC 1123, always GMT)
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an HTTP date, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date (RFC 1123 / RFC 2822 syntax) into UTC
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc2822(value.trim()).map(|t| t.with_timezone(&Utc))
}

/// Current time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
