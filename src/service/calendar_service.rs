use async_trait::async_trait;

use crate::error::SchedulerError;
use crate::models::event::CalendarEvent;
use crate::models::window::TimeWindow;

/// Source of an attendee's busy intervals inside a window, ordered by start
/// time. The pipeline owns timeouts, retries, and degradation; implementations
/// just fetch.
#[async_trait]
pub trait CalendarEventStore: Send + Sync {
    async fn fetch_busy(
        &self,
        attendee: &str,
        window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, SchedulerError>;
}

/// What the pipeline does when an attendee's fetch fails after all retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFallback {
    /// Treat the attendee as fully free and keep scheduling.
    Empty,
    /// Abort the whole request.
    Fail,
}

impl FetchFallback {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "empty" => Ok(FetchFallback::Empty),
            "fail" => Ok(FetchFallback::Fail),
            other => Err(format!("Invalid fetch fallback policy: {}", other)),
        }
    }
}
