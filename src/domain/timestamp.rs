use chrono::{DateTime, FixedOffset};

/// Upstream creation date layout, e.g. `Wed Oct 10 20:19:24 +0000 2018`
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse an upstream creation date into an offset-aware timestamp
pub fn parse_created_at(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(value.trim(), CREATED_AT_FORMAT)
}
