use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::heatmap::DataPoint;

/// One tracked activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub project: String,
    pub timestamp: DateTime<FixedOffset>,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Record {
    pub fn new(project: impl Into<String>, timestamp: DateTime<FixedOffset>, value: i64) -> Self {
        Self {
            project: project.into(),
            timestamp,
            value,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns a description of the first problem found, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.project.trim().is_empty() {
            return Err("project name is empty".to_string());
        }
        if self.value <= 0 {
            return Err(format!("value must be positive, got {}", self.value));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err("tags must not be empty".to_string());
        }
        Ok(())
    }
}

/// Selects which records feed a heatmap. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub project: Option<String>,
    /// A record must carry every listed tag.
    pub tags: Vec<String>,
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(ref project) = self.project {
            if &record.project != project {
                return false;
            }
        }
        if !self.tags.iter().all(|t| record.tags.contains(t)) {
            return false;
        }
        if self.from.is_some_and(|from| record.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.timestamp > to) {
            return false;
        }
        true
    }

    /// Matching records as data points, ascending by timestamp.
    pub fn points(&self, records: &[Record]) -> Vec<DataPoint> {
        let mut points: Vec<DataPoint> = records
            .iter()
            .filter(|r| self.matches(r))
            .map(|r| DataPoint::new(r.timestamp, r.value))
            .collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}
