use std::collections::HashMap;

use crate::models::event::{AttendeeSchedule, CalendarEvent};
use crate::models::meeting::{AttendeeEvents, MeetingRequest, MeetingResponse};
use crate::models::window::ScheduledSlot;

pub struct AssemblyService;

impl AssemblyService {
    /// Everyone the meeting is booked for: the sender prepended unless
    /// already listed, duplicates collapsed to their first occurrence.
    pub fn attendee_roster(request: &MeetingRequest) -> Vec<String> {
        let listed: Vec<String> = request
            .attendees
            .iter()
            .map(|attendee| attendee.email.clone())
            .collect();
        let mut roster: Vec<String> = Vec::new();
        if !listed.contains(&request.from) {
            roster.push(request.from.clone());
        }
        for email in listed {
            if !roster.contains(&email) {
                roster.push(email);
            }
        }
        roster
    }

    /// Builds the final scheduling record: the new meeting appended to each
    /// attendee's existing events (prior order kept, no re-sort) and the slot
    /// echoed alongside every original request field.
    pub fn assemble(
        request: &MeetingRequest,
        all_attendees: &[String],
        slot: &ScheduledSlot,
        schedules: &AttendeeSchedule,
    ) -> MeetingResponse {
        let meeting = CalendarEvent {
            start_time: slot.start.fixed_offset(),
            end_time: slot.end.fixed_offset(),
            num_attendees: all_attendees.len(),
            attendees: all_attendees.to_vec(),
            summary: request.subject.clone(),
        };

        let attendees = all_attendees
            .iter()
            .map(|email| {
                let mut events = schedules.get(email).cloned().unwrap_or_default();
                events.push(meeting.clone());
                AttendeeEvents {
                    email: email.clone(),
                    events,
                }
            })
            .collect();

        MeetingResponse {
            request_id: request.request_id.clone(),
            from: request.from.clone(),
            attendees,
            subject: request.subject.clone(),
            email_content: request.email_content.clone(),
            event_start: slot.start.to_rfc3339(),
            event_end: slot.end.to_rfc3339(),
            duration_mins: slot.duration_minutes.to_string(),
            meta_data: HashMap::new(),
            extra: request.extra.clone(),
        }
    }
}
