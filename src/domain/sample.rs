// Sample domain model and wire decoding
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One timestamped measurement.
///
/// `value` is `NaN` when the service sent something that is not a number;
/// the sample keeps its position so labels and values stay aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn is_numeric(&self) -> bool {
        !self.value.is_nan()
    }
}

/// Sample as it arrives from the metrics service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub timestamp: String,
    #[serde(default)]
    pub value: Value,
}

impl RawSample {
    /// Returns `None` when the timestamp is not ISO-8601.
    pub fn into_sample(self) -> Option<Sample> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Some(Sample::new(timestamp, coerce_value(&self.value)))
    }
}

/// Parse an ISO-8601 timestamp. Naive timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // "+0000" style offsets are not RFC 3339
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Coerce a JSON value to a number, yielding `NaN` when that is not possible.
/// Non-finite results (`"inf"`, `"-Infinity"`) are `NaN` too.
pub fn coerce_value(value: &Value) -> f64 {
    let coerced = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    };
    if coerced.is_finite() {
        coerced
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_coerce_numbers_and_strings() {
        assert_eq!(coerce_value(&json!(75)), 75.0);
        assert_eq!(coerce_value(&json!(97.5)), 97.5);
        assert_eq!(coerce_value(&json!("72")), 72.0);
        assert_eq!(coerce_value(&json!(" 61.25 ")), 61.25);
        assert_eq!(coerce_value(&json!("")), 0.0);
        assert_eq!(coerce_value(&json!(true)), 1.0);
    }

    #[test]
    fn test_coerce_failures_are_nan() {
        assert!(coerce_value(&json!("abc")).is_nan());
        assert!(coerce_value(&json!(null)).is_nan());
        assert!(coerce_value(&json!([1, 2])).is_nan());
        assert!(coerce_value(&json!({"v": 1})).is_nan());
    }

    #[test]
    fn test_coerce_non_finite_strings_are_nan() {
        assert!(coerce_value(&json!("inf")).is_nan());
        assert!(coerce_value(&json!("Infinity")).is_nan());
        assert!(coerce_value(&json!("-infinity")).is_nan());
        assert!(coerce_value(&json!("NaN")).is_nan());
        assert_eq!(coerce_value(&json!("1e3")), 1000.0);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-01T08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T08:30:00+0000"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T08:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2024-01-01T08:30:00.250000").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_raw_sample_missing_value_is_marker() {
        let raw: RawSample = serde_json::from_value(json!({"timestamp": "2024-01-01T00:00:00"})).unwrap();
        let sample = raw.into_sample().unwrap();
        assert!(!sample.is_numeric());
    }
}
