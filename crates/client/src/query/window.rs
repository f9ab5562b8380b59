//! Evaluation time window.

use chrono::{DateTime, Utc};

/// Start and end of an evaluation, rendered as epoch milliseconds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Start as an epoch-millisecond string.
    pub fn start_millis(&self) -> String {
        self.start.timestamp_millis().to_string()
    }

    /// End as an epoch-millisecond string.
    pub fn end_millis(&self) -> String {
        self.end.timestamp_millis().to_string()
    }
}
