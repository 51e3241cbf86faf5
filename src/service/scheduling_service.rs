use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::models::event::{AttendeeSchedule, CalendarEvent};
use crate::models::meeting::{MeetingRequest, MeetingResponse};
use crate::models::window::TimeWindow;
use crate::service::assembly_service::AssemblyService;
use crate::service::calendar_service::{CalendarEventStore, FetchFallback};
use crate::service::extraction_service::MeetingExtractor;
use crate::service::slot_service::SlotService;
use crate::service::window_service::WindowService;

/// The fixed-order scheduling pipeline: extract intent, resolve the window,
/// fetch everyone's busy intervals, pick a slot, assemble the result.
pub struct SchedulingService {
    extractor: Arc<dyn MeetingExtractor>,
    calendar: Arc<dyn CalendarEventStore>,
    config: SchedulerConfig,
}

impl SchedulingService {
    pub fn new(
        extractor: Arc<dyn MeetingExtractor>,
        calendar: Arc<dyn CalendarEventStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            extractor,
            calendar,
            config,
        }
    }

    /// Never fails: any pipeline error is folded into the response envelope
    /// so the caller always gets the request echoed back.
    pub async fn schedule(&self, request: MeetingRequest, now: DateTime<Utc>) -> MeetingResponse {
        match self.schedule_inner(&request, now).await {
            Ok(response) => response,
            Err(err) => {
                error!(request_id = %request.request_id, error = %err, "scheduling request failed");
                MeetingResponse::failure(&request, &err.to_string())
            }
        }
    }

    async fn schedule_inner(
        &self,
        request: &MeetingRequest,
        now: DateTime<Utc>,
    ) -> Result<MeetingResponse, SchedulerError> {
        let info = self
            .extractor
            .extract(&request.email_content)
            .await
            .map_err(|err| SchedulerError::Extraction {
                reason: err.to_string(),
            })?;
        if info.meeting_duration <= 0 {
            return Err(SchedulerError::InvalidDuration {
                minutes: info.meeting_duration,
            });
        }

        let window = WindowService::resolve(
            now,
            &info.time_constraints,
            info.meeting_duration,
            self.config.timezone,
        )?;
        debug!(request_id = %request.request_id, window = %window, "resolved scheduling window");

        let all_attendees = AssemblyService::attendee_roster(request);
        let schedules = self.fetch_schedules(&all_attendees, &window).await?;

        let slot = SlotService::find_slot(
            &window,
            info.meeting_duration,
            &schedules,
            self.config.slot_strategy,
        )?;
        info!(
            request_id = %request.request_id,
            start = %slot.start.to_rfc3339(),
            attendees = all_attendees.len(),
            "scheduled meeting slot"
        );

        Ok(AssemblyService::assemble(
            request,
            &all_attendees,
            &slot,
            &schedules,
        ))
    }

    // Fan out one fetch task per attendee, fan back in to the schedule map.
    // The map is the synchronization barrier before slot search runs.
    async fn fetch_schedules(
        &self,
        attendees: &[String],
        window: &TimeWindow,
    ) -> Result<AttendeeSchedule, SchedulerError> {
        let mut handles = Vec::with_capacity(attendees.len());
        for attendee in attendees {
            let calendar = self.calendar.clone();
            let window = window.clone();
            let attendee = attendee.clone();
            let fetch_timeout = self.config.fetch_timeout;
            let retries = self.config.fetch_retries;
            handles.push((
                attendee.clone(),
                tokio::spawn(async move {
                    fetch_with_retry(calendar.as_ref(), &attendee, &window, fetch_timeout, retries)
                        .await
                }),
            ));
        }

        let mut schedules: AttendeeSchedule = HashMap::new();
        for (attendee, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(SchedulerError::CalendarFetch {
                    attendee: attendee.clone(),
                    reason: err.to_string(),
                }),
            };
            let events = match outcome {
                Ok(events) => events,
                Err(err) => match self.config.fetch_fallback {
                    FetchFallback::Empty => {
                        warn!(attendee = %attendee, error = %err, "calendar fetch degraded to empty schedule");
                        Vec::new()
                    }
                    FetchFallback::Fail => return Err(err),
                },
            };
            schedules.insert(attendee, events);
        }
        Ok(schedules)
    }
}

async fn fetch_with_retry(
    calendar: &dyn CalendarEventStore,
    attendee: &str,
    window: &TimeWindow,
    fetch_timeout: Duration,
    retries: u32,
) -> Result<Vec<CalendarEvent>, SchedulerError> {
    let mut last_error = SchedulerError::CalendarFetch {
        attendee: attendee.to_string(),
        reason: "no fetch attempts made".to_string(),
    };
    for attempt in 0..=retries {
        match timeout(fetch_timeout, calendar.fetch_busy(attendee, window)).await {
            Ok(Ok(events)) => return Ok(events),
            Ok(Err(err)) => last_error = err,
            Err(_) => {
                last_error = SchedulerError::CalendarFetch {
                    attendee: attendee.to_string(),
                    reason: format!("timed out after {:?}", fetch_timeout),
                }
            }
        }
        if attempt < retries {
            debug!(attendee = %attendee, attempt, "retrying calendar fetch");
        }
    }
    Err(last_error)
}
