use thiserror::Error;

use crate::models::window::TimeWindow;

/// Failure modes of a scheduling request. Calendar fetch errors are normally
/// absorbed by the configured fallback policy before they reach the caller;
/// the rest abort the request and end up in the response MetaData.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid meeting duration: {minutes} minutes")]
    InvalidDuration { minutes: i64 },

    #[error("window {window} is shorter than the requested {minutes} minutes")]
    WindowTooShort { minutes: i64, window: TimeWindow },

    #[error("no free {minutes}-minute slot for all attendees in window {window}")]
    NoSlotAvailable { minutes: i64, window: TimeWindow },

    #[error("calendar fetch failed for {attendee}: {reason}")]
    CalendarFetch { attendee: String, reason: String },

    #[error("meeting extraction failed: {reason}")]
    Extraction { reason: String },
}
