use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::MalformedTimestamp;
use crate::models::notification::RawTimestamp;

pub const PLACEHOLDER: &str = "Unknown date";

// Epochs at or above this magnitude are milliseconds (year 5138 in seconds).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert any `createdAt` shape the backend produces into a UTC instant.
pub fn normalize(raw: &RawTimestamp) -> Result<DateTime<Utc>, MalformedTimestamp> {
    let parsed = match raw {
        RawTimestamp::Text(text) => from_text(text.trim()),
        RawTimestamp::Integer(n) => from_epoch(*n),
        RawTimestamp::Float(n) => from_float_epoch(*n),
        RawTimestamp::Object(map) => from_object(map),
        RawTimestamp::Other(_) => None,
    };

    parsed.ok_or_else(|| MalformedTimestamp { raw: raw.to_string() })
}

/// Display string for a normalized timestamp, or the placeholder.
pub fn label(created_at: Option<&DateTime<Utc>>) -> String {
    match created_at {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => PLACEHOLDER.to_string(),
    }
}

fn from_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    text.parse::<i64>().ok().and_then(from_epoch)
}

fn from_epoch(n: i64) -> Option<DateTime<Utc>> {
    if n.unsigned_abs() >= MILLIS_THRESHOLD as u64 {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

fn from_float_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }

    let millis = if n.abs() >= MILLIS_THRESHOLD as f64 { n } else { n * 1000.0 };
    Utc.timestamp_millis_opt(millis.round() as i64).single()
}

fn from_object(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let seconds = ["seconds", "_seconds"]
        .iter()
        .find_map(|key| map.get(*key))
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))?;

    let nanos = ["nanoseconds", "_nanoseconds"]
        .iter()
        .find_map(|key| map.get(*key))
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    let nanos = u32::try_from(nanos).ok().filter(|n| *n < 1_000_000_000)?;
    Utc.timestamp_opt(seconds, nanos).single()
}
