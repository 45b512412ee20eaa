// Series projector - Turns samples into chart-ready data
use crate::domain::chart::{
    AxisConfig, ChartSeries, DisplayConfig, LegendConfig, LineStyle, Projection, TextConfig,
    TickConfig, TooltipConfig,
};
use crate::domain::metric::Metric;
use crate::domain::sample::Sample;
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use std::fmt::Write;
use thiserror::Error;

/// Month/day/year with a 12-hour clock, e.g. `1/3/2024, 2:05:00 PM`.
pub const DEFAULT_LABEL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Error)]
#[error("Invalid label format: {0}")]
pub struct LabelFormatError(String);

/// Formats timestamps into labels at a fixed UTC offset so output is
/// reproducible regardless of the host timezone.
#[derive(Debug, Clone)]
pub struct SeriesProjector {
    offset: FixedOffset,
    label_format: String,
}

impl Default for SeriesProjector {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

impl SeriesProjector {
    pub fn new(utc_offset_minutes: i32, label_format: &str) -> Result<Self, LabelFormatError> {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                LabelFormatError(format!("UTC offset out of range: {} minutes", utc_offset_minutes))
            })?;

        if StrftimeItems::new(label_format).any(|item| matches!(item, Item::Error)) {
            return Err(LabelFormatError(label_format.to_string()));
        }

        Ok(Self {
            offset,
            label_format: label_format.to_string(),
        })
    }

    pub fn label(&self, sample: &Sample) -> String {
        let mut label = String::new();
        let local = sample.timestamp.with_timezone(&self.offset);
        // Format items were validated in `new`
        let _ = write!(label, "{}", local.format(&self.label_format));
        label
    }

    /// Project samples in input order. No sorting, deduplication or gap filling.
    pub fn project(&self, samples: &[Sample], metric: Metric) -> Projection {
        let mut series = ChartSeries::with_capacity(samples.len());
        for sample in samples {
            series.push(self.label(sample), sample.value);
        }

        Projection {
            total_points: samples.len(),
            series,
            config: display_config(metric),
        }
    }
}

/// Titles and axis labels for a metric. Pure string templating.
pub fn display_config(metric: Metric) -> DisplayConfig {
    let name = metric.as_str().to_uppercase();

    DisplayConfig {
        title: TextConfig {
            text: format!("{} Trend", name),
            font_size: 22,
        },
        series_label: format!("{} over time", name),
        legend: LegendConfig {
            display: true,
            position: "top",
        },
        tooltip: TooltipConfig {
            mode: "index",
            intersect: false,
        },
        x_axis: AxisConfig {
            title: TextConfig {
                text: "Timestamp".to_string(),
                font_size: 14,
            },
            ticks: Some(TickConfig {
                max_rotation: 45,
                min_rotation: 0,
                auto_skip: true,
                max_ticks_limit: 30,
            }),
        },
        y_axis: AxisConfig {
            title: TextConfig {
                text: "Value".to_string(),
                font_size: 14,
            },
            ticks: None,
        },
        style: LineStyle::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::RawSample;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn sample_at(hour: u32, value: f64) -> Sample {
        Sample::new(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(), value)
    }

    #[test]
    fn test_empty_samples_for_every_metric() {
        let projector = SeriesProjector::default();
        for metric in Metric::ALL {
            let projection = projector.project(&[], metric);
            assert_eq!(projection.total_points, 0);
            assert!(projection.series.labels.is_empty());
            assert!(projection.series.values.is_empty());
        }
    }

    #[test]
    fn test_string_and_number_values() {
        let raw: Vec<RawSample> = serde_json::from_value(json!([
            {"timestamp": "2024-01-01T00:00:00", "value": "72"},
            {"timestamp": "2024-01-01T00:01:00", "value": 75}
        ]))
        .unwrap();
        let samples: Vec<Sample> = raw.into_iter().filter_map(RawSample::into_sample).collect();

        let projection = SeriesProjector::default().project(&samples, Metric::HeartRate);

        assert_eq!(projection.series.values, vec![72.0, 75.0]);
        assert_eq!(
            projection.series.labels,
            vec!["1/1/2024, 12:00:00 AM", "1/1/2024, 12:01:00 AM"]
        );
        assert_eq!(projection.total_points, 2);
    }

    #[test]
    fn test_preserves_input_order_and_duplicates() {
        let samples = vec![sample_at(5, 1.0), sample_at(2, 2.0), sample_at(5, 1.0)];
        let projection = SeriesProjector::default().project(&samples, Metric::Spo2);

        assert_eq!(projection.series.values, vec![1.0, 2.0, 1.0]);
        assert_eq!(projection.series.labels[0], projection.series.labels[2]);
        assert_eq!(projection.series.labels[1], "1/1/2024, 2:00:00 AM");
    }

    #[test]
    fn test_non_numeric_value_keeps_position() {
        let samples = vec![sample_at(1, 60.0), sample_at(2, f64::NAN), sample_at(3, 62.0)];
        let projection = SeriesProjector::default().project(&samples, Metric::HeartRate);

        assert_eq!(projection.series.labels.len(), 3);
        assert_eq!(projection.series.values.len(), 3);
        assert!(projection.series.values[1].is_nan());

        let json = serde_json::to_value(&projection.series).unwrap();
        assert_eq!(json["values"], json!([60.0, null, 62.0]));
    }

    #[test]
    fn test_lengths_always_match() {
        let projector = SeriesProjector::default();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for n in [0usize, 1, 7, 48, 500] {
            let samples: Vec<Sample> = (0..n)
                .map(|i| Sample::new(base + Duration::minutes(i as i64), i as f64))
                .collect();
            let projection = projector.project(&samples, Metric::Activity);
            assert_eq!(projection.series.labels.len(), n);
            assert_eq!(projection.series.values.len(), n);
            assert_eq!(projection.total_points, n);
        }
    }

    #[test]
    fn test_labels_use_configured_offset() {
        let projector = SeriesProjector::new(-300, "%Y-%m-%d %H:%M").unwrap();
        let label = projector.label(&sample_at(3, 0.0));
        assert_eq!(label, "2023-12-31 22:00");
    }

    #[test]
    fn test_rejects_invalid_label_format() {
        assert!(SeriesProjector::new(0, "%Q").is_err());
        assert!(SeriesProjector::new(24 * 60, DEFAULT_LABEL_FORMAT).is_err());
    }

    #[test]
    fn test_display_config_titles() {
        let config = display_config(Metric::ActiveZoneMinute);
        assert_eq!(config.title.text, "ACTIVE_ZONE_MINUTE Trend");
        assert_eq!(config.series_label, "ACTIVE_ZONE_MINUTE over time");
        assert_eq!(config.x_axis.title.text, "Timestamp");
        assert_eq!(config.y_axis.title.text, "Value");

        let config = display_config(Metric::HeartRate);
        assert_eq!(config.title.text, "HEART_RATE Trend");
    }
}
