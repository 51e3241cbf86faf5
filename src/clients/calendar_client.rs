use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::SchedulerError;
use crate::models::event::CalendarEvent;
use crate::models::window::TimeWindow;
use crate::service::calendar_service::CalendarEventStore;

/// Calendar provider binding over a Google-calendar-shaped events API.
/// Provider auth is a bearer token handed in at construction; nothing about
/// tokens leaks into the scheduling core.
pub struct HttpCalendarClient {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ProviderEventList {
    #[serde(default)]
    items: Vec<ProviderEvent>,
}

#[derive(Debug, Deserialize)]
struct ProviderEvent {
    start: ProviderEventTime,
    end: ProviderEventTime,
    #[serde(default)]
    attendees: Vec<ProviderAttendee>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderEventTime {
    #[serde(rename = "dateTime")]
    date_time: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
struct ProviderAttendee {
    email: String,
}

impl HttpCalendarClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url,
            api_token,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_events(
        &self,
        attendee: &str,
        window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!(
            "{}/users/{}/events",
            self.base_url.trim_end_matches('/'),
            attendee
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("timeMin", window.start.to_rfc3339()),
                ("timeMax", window.end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!("calendar request failed with status {}: {}", status, text).into());
        }

        let parsed: ProviderEventList = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse calendar JSON: {}", e))?;
        let mut events: Vec<CalendarEvent> = parsed.items.into_iter().map(to_busy_event).collect();
        // Providers usually honor orderBy, but the contract promises it.
        events.sort_by_key(|event| event.start_time);
        Ok(events)
    }
}

fn to_busy_event(event: ProviderEvent) -> CalendarEvent {
    let mut emails: BTreeSet<String> = event
        .attendees
        .into_iter()
        .map(|attendee| attendee.email)
        .collect();
    if emails.is_empty() {
        // Solo events come back without an attendee list.
        emails.insert("SELF".to_string());
    }
    CalendarEvent {
        start_time: event.start.date_time,
        end_time: event.end.date_time,
        num_attendees: emails.len(),
        attendees: emails.into_iter().collect(),
        summary: event.summary.unwrap_or_else(|| "No Title".to_string()),
    }
}

#[async_trait]
impl CalendarEventStore for HttpCalendarClient {
    async fn fetch_busy(
        &self,
        attendee: &str,
        window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, SchedulerError> {
        self.fetch_events(attendee, window)
            .await
            .map_err(|err| SchedulerError::CalendarFetch {
                attendee: attendee.to_string(),
                reason: err.to_string(),
            })
    }
}
