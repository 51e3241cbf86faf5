use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::event::CalendarEvent;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendeeRef {
    pub email: String,
}

/// Incoming scheduling request. Fields the scheduler does not interpret
/// (Datetime, Location, ...) are captured in `extra` and echoed back verbatim.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetingRequest {
    #[serde(rename = "Request_id")]
    pub request_id: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Attendees")]
    pub attendees: Vec<AttendeeRef>,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "EmailContent")]
    pub email_content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Structured meeting intent pulled out of the email body by the extractor.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetingInfo {
    pub participants: String,
    pub time_constraints: String,
    pub meeting_duration: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendeeEvents {
    pub email: String,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

/// Scheduling result: the request echoed back, the chosen slot, and each
/// attendee's event list with the new meeting appended.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetingResponse {
    #[serde(rename = "Request_id")]
    pub request_id: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Attendees")]
    pub attendees: Vec<AttendeeEvents>,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "EmailContent")]
    pub email_content: String,
    #[serde(rename = "EventStart")]
    pub event_start: String,
    #[serde(rename = "EventEnd")]
    pub event_end: String,
    #[serde(rename = "Duration_mins")]
    pub duration_mins: String,
    #[serde(rename = "MetaData")]
    pub meta_data: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MeetingResponse {
    /// Best-effort envelope for a failed request: every input field echoed,
    /// slot fields left empty, the error message under MetaData["error"].
    pub fn failure(request: &MeetingRequest, message: &str) -> Self {
        let attendees = request
            .attendees
            .iter()
            .map(|attendee| AttendeeEvents {
                email: attendee.email.clone(),
                events: Vec::new(),
            })
            .collect();
        let mut meta_data = HashMap::new();
        meta_data.insert("error".to_string(), message.to_string());
        Self {
            request_id: request.request_id.clone(),
            from: request.from.clone(),
            attendees,
            subject: request.subject.clone(),
            email_content: request.email_content.clone(),
            event_start: String::new(),
            event_end: String::new(),
            duration_mins: String::new(),
            meta_data,
            extra: request.extra.clone(),
        }
    }
}
