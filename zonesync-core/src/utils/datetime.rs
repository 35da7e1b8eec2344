//! Timestamp helpers.
//!
//! Zones and records carry `DateTime<Utc>` in memory and RFC3339 strings at every boundary
//! (serde and the SQL columns), so both directions live here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_storage(dt))
}

/// Deserializes `DateTime<Utc>` from an RFC3339 string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let s = String::deserialize(deserializer)?;
    parse(&s).ok_or_else(|| Error::custom(format!("Invalid RFC3339 timestamp: {s}")))
}

/// Storage form of a timestamp.
///
/// Keeps sub-second precision so that `updated_at` strictly advances between two writes
/// issued in the same second.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

/// Parses an RFC3339 timestamp, normalizing to UTC.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
