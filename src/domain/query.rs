// Query parameter domain model
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::metric::Metric;

/// Wire format for calendar dates (no time-of-day, no timezone).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("User ID cannot be empty")]
    EmptyUserId,

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown query field: {0}")]
    UnknownField(String),

    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Parameters of a single metrics query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: String,
    pub metric: Metric,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap_or_default(),
            user_id: "synthetic_001".to_string(),
            metric: Metric::HeartRate,
        }
    }
}

/// A single field edit, as produced by an input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryField {
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    UserId(String),
    Metric(Metric),
}

impl QueryField {
    /// Build a field edit from its wire name and raw text value.
    ///
    /// Only type coercion happens here; range checks are left to
    /// [`QueryParameters::validate`].
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        match field {
            "start_date" => parse_date("start_date", value).map(QueryField::StartDate),
            "end_date" => parse_date("end_date", value).map(QueryField::EndDate),
            "user_id" => Ok(QueryField::UserId(value.to_string())),
            "metric" => value.parse().map(QueryField::Metric),
            _ => Err(ValidationError::UnknownField(field.to_string())),
        }
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

impl QueryParameters {
    pub fn apply(&mut self, field: QueryField) {
        match field {
            QueryField::StartDate(date) => self.start_date = date,
            QueryField::EndDate(date) => self.end_date = date,
            QueryField::UserId(user_id) => self.user_id = user_id,
            QueryField::Metric(metric) => self.metric = metric,
        }
    }

    /// Checks the invariants that must hold before a request is dispatched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_date > self.end_date {
            return Err(ValidationError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(())
    }

    /// Query string pairs in the order the service documents them.
    pub fn to_query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("start_date", self.start_date.format(DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(DATE_FORMAT).to_string()),
            ("user_id", self.user_id.clone()),
            ("metric", self.metric.as_str().to_string()),
        ]
    }
}
