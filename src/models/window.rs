use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

/// Candidate range for placing the meeting. Both boundaries carry the
/// configured zone; start < end always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// The chosen meeting time. end - start always equals the duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub duration_minutes: i64,
}
