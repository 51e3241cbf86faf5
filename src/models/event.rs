use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A busy interval on an attendee's calendar, in the shape the provider
/// reports it. Field names follow the scheduling wire format.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalendarEvent {
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(rename = "EndTime")]
    pub end_time: DateTime<FixedOffset>,
    #[serde(rename = "NumAttendees")]
    pub num_attendees: usize,
    #[serde(rename = "Attendees")]
    pub attendees: Vec<String>,
    #[serde(rename = "Summary")]
    pub summary: String,
}

/// Busy intervals per attendee email, each list ordered by start time.
/// Built once by the fetch fan-in, read-only afterwards.
pub type AttendeeSchedule = HashMap<String, Vec<CalendarEvent>>;
