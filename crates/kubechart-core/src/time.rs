//! Kubernetes wire formats for timestamps
//!
//! Use with `#[serde(with = "...")]` on `Option<DateTime<Utc>>` fields
//! together with `skip_serializing_if = "Option::is_none"`, so unset
//! timestamps stay absent instead of becoming empty strings.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `metav1.Time`: second precision
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// `metav1.MicroTime`: microsecond precision
pub const MICRO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Format a timestamp the way the API server expects it
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Format a timestamp with microsecond precision
pub fn format_micro_time(time: &DateTime<Utc>) -> String {
    time.format(MICRO_TIME_FORMAT).to_string()
}

fn parse_with(s: &str, format: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, format).map(|t| t.and_utc())
}

macro_rules! optional_time_serde {
    ($name:ident, $format:ident) => {
        pub mod $name {
            use chrono::{DateTime, Utc};
            use serde::{Deserialize, Deserializer, Serializer};

            pub fn serialize<S>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                match time {
                    Some(t) => serializer.serialize_str(&t.format(super::$format).to_string()),
                    None => serializer.serialize_none(),
                }
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
            where
                D: Deserializer<'de>,
            {
                Option::<String>::deserialize(deserializer)?
                    .map(|s| super::parse_with(&s, super::$format).map_err(serde::de::Error::custom))
                    .transpose()
            }
        }
    };
}

optional_time_serde!(time_serde, TIME_FORMAT);
optional_time_serde!(micro_time_serde, MICRO_TIME_FORMAT);
