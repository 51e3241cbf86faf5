use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use meetingScheduler::config::SchedulerConfig;
use meetingScheduler::error::SchedulerError;
use meetingScheduler::models::event::CalendarEvent;
use meetingScheduler::models::meeting::{AttendeeRef, MeetingInfo, MeetingRequest};
use meetingScheduler::models::window::TimeWindow;
use meetingScheduler::service::calendar_service::{CalendarEventStore, FetchFallback};
use meetingScheduler::service::extraction_service::MeetingExtractor;
use meetingScheduler::service::scheduling_service::SchedulingService;

struct FakeExtractor;

#[async_trait::async_trait]
impl MeetingExtractor for FakeExtractor {
    async fn extract(
        &self,
        _email_content: &str,
    ) -> Result<MeetingInfo, Box<dyn std::error::Error + Send + Sync>> {
        Ok(MeetingInfo {
            participants: String::new(),
            time_constraints: "thursday".to_string(),
            meeting_duration: 30,
        })
    }
}

// Fails fetches for one attendee, answers normally for the rest.
struct FlakyCalendar {
    failing_attendee: String,
    events: HashMap<String, Vec<CalendarEvent>>,
}

#[async_trait::async_trait]
impl CalendarEventStore for FlakyCalendar {
    async fn fetch_busy(
        &self,
        attendee: &str,
        _window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, SchedulerError> {
        if attendee == self.failing_attendee {
            return Err(SchedulerError::CalendarFetch {
                attendee: attendee.to_string(),
                reason: "provider returned status 503".to_string(),
            });
        }
        Ok(self.events.get(attendee).cloned().unwrap_or_default())
    }
}

// Never answers within any sane test timeout.
struct StalledCalendar {
    attempts: AtomicU32,
}

#[async_trait::async_trait]
impl CalendarEventStore for StalledCalendar {
    async fn fetch_busy(
        &self,
        _attendee: &str,
        _window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, SchedulerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
}

fn reference_now() -> DateTime<Utc> {
    Kolkata
        .with_ymd_and_hms(2025, 7, 9, 12, 34, 55)
        .unwrap()
        .with_timezone(&Utc)
}

fn test_request() -> MeetingRequest {
    MeetingRequest {
        request_id: "req-42".to_string(),
        from: "userone@example.com".to_string(),
        attendees: vec![
            AttendeeRef {
                email: "usertwo@example.com".to_string(),
            },
            AttendeeRef {
                email: "userthree@example.com".to_string(),
            },
        ],
        subject: "Weekly Sync".to_string(),
        email_content: "Thursday, 30 minutes.".to_string(),
        extra: serde_json::Map::new(),
    }
}

fn test_config(fallback: FetchFallback) -> SchedulerConfig {
    SchedulerConfig {
        timezone: Kolkata,
        fetch_fallback: fallback,
        fetch_timeout: Duration::from_millis(100),
        fetch_retries: 1,
        ..SchedulerConfig::default()
    }
}

#[tokio::test]
async fn one_failed_fetch_degrades_to_an_empty_schedule() {
    let mut events = HashMap::new();
    events.insert(
        "userone@example.com".to_string(),
        vec![CalendarEvent {
            start_time: Kolkata
                .with_ymd_and_hms(2025, 7, 10, 9, 0, 0)
                .unwrap()
                .fixed_offset(),
            end_time: Kolkata
                .with_ymd_and_hms(2025, 7, 10, 9, 30, 0)
                .unwrap()
                .fixed_offset(),
            num_attendees: 1,
            attendees: vec!["SELF".to_string()],
            summary: "Standup".to_string(),
        }],
    );
    let calendar = Arc::new(FlakyCalendar {
        failing_attendee: "usertwo@example.com".to_string(),
        events,
    });

    let service = SchedulingService::new(
        Arc::new(FakeExtractor),
        calendar,
        test_config(FetchFallback::Empty),
    );
    let response = service.schedule(test_request(), reference_now()).await;

    // The request still succeeds with all three attendees present.
    assert!(response.meta_data.is_empty());
    assert_eq!(response.attendees.len(), 3);
    let failed = response
        .attendees
        .iter()
        .find(|attendee| attendee.email == "usertwo@example.com")
        .unwrap();
    // Fallback schedule is empty, so the only event is the new meeting.
    assert_eq!(failed.events.len(), 1);
    assert_eq!(failed.events[0].summary, "Weekly Sync");
    assert_eq!(response.event_start, "2025-07-10T09:30:00+05:30");
}

#[tokio::test]
async fn fail_policy_aborts_the_request() {
    let calendar = Arc::new(FlakyCalendar {
        failing_attendee: "usertwo@example.com".to_string(),
        events: HashMap::new(),
    });

    let service = SchedulingService::new(
        Arc::new(FakeExtractor),
        calendar,
        test_config(FetchFallback::Fail),
    );
    let response = service.schedule(test_request(), reference_now()).await;

    assert_eq!(response.event_start, "");
    let error = response.meta_data.get("error").unwrap();
    assert!(error.contains("usertwo@example.com"));
    assert!(error.contains("503"));
}

#[tokio::test]
async fn stalled_fetches_time_out_and_degrade() {
    let calendar = Arc::new(StalledCalendar {
        attempts: AtomicU32::new(0),
    });

    let service = SchedulingService::new(
        Arc::new(FakeExtractor),
        calendar.clone(),
        test_config(FetchFallback::Empty),
    );
    let response = service.schedule(test_request(), reference_now()).await;

    assert!(response.meta_data.is_empty());
    assert_eq!(response.attendees.len(), 3);
    for attendee in &response.attendees {
        assert_eq!(attendee.events.len(), 1);
    }
    // One initial attempt plus one retry per attendee.
    assert_eq!(calendar.attempts.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn stalled_fetch_with_fail_policy_surfaces_the_timeout() {
    let calendar = Arc::new(StalledCalendar {
        attempts: AtomicU32::new(0),
    });

    let service = SchedulingService::new(
        Arc::new(FakeExtractor),
        calendar,
        test_config(FetchFallback::Fail),
    );
    let response = service.schedule(test_request(), reference_now()).await;

    assert_eq!(response.event_start, "");
    assert!(response.meta_data.get("error").unwrap().contains("timed out"));
}
