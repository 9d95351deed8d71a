//! Timestamps and identifiers
//!
//! Every timestamp written to the store goes through [`to_db`], which always
//! produces RFC 3339 UTC text with millisecond precision. A fixed width means
//! text ordering in SQL matches chronological ordering.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Current time, truncated to what the store can represent.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Encode a timestamp for storage
pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored timestamp
pub fn from_db(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Generate a fresh identifier such as `item-0b7c...`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_db_encoding_round_trips() {
        let ts = now();
        assert_eq!(from_db(&to_db(&ts)).unwrap(), ts);
    }

    #[test]
    fn test_db_encoding_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_db(&a), "2024-01-02T03:04:05.000Z");

        let b = a + chrono::Duration::milliseconds(7);
        assert!(to_db(&a) < to_db(&b));
    }

    #[test]
    fn test_ids_are_prefixed_and_distinct() {
        let a = new_id("item");
        let b = new_id("item");
        assert!(a.starts_with("item-"));
        assert_ne!(a, b);
    }
}
