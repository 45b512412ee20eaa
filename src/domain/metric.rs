// Metric domain model
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::query::ValidationError;

/// The closed set of quantities the metrics service can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    HeartRate,
    Spo2,
    Activity,
    Hrv,
    ActiveZoneMinute,
    BreathRate,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::HeartRate,
        Metric::Spo2,
        Metric::Activity,
        Metric::Hrv,
        Metric::ActiveZoneMinute,
        Metric::BreathRate,
    ];

    /// Name used on the wire (`metric=` query parameter).
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heart_rate",
            Metric::Spo2 => "spo2",
            Metric::Activity => "activity",
            Metric::Hrv => "hrv",
            Metric::ActiveZoneMinute => "active_zone_minute",
            Metric::BreathRate => "breath_rate",
        }
    }

    /// Label shown in selection controls.
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart Rate",
            Metric::Spo2 => "SpO2",
            Metric::Activity => "Activity",
            Metric::Hrv => "HRV",
            Metric::ActiveZoneMinute => "Active Zone Minute",
            Metric::BreathRate => "Breath Rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_reject_unknown_metric() {
        let err = "blood_pressure".parse::<Metric>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownMetric("blood_pressure".to_string()));

        // Wire names are case sensitive
        assert!("HEART_RATE".parse::<Metric>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Metric::ActiveZoneMinute).unwrap();
        assert_eq!(json, "\"active_zone_minute\"");

        let metric: Metric = serde_json::from_str("\"spo2\"").unwrap();
        assert_eq!(metric, Metric::Spo2);
    }
}
