use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::error::SchedulerError;
use crate::models::event::AttendeeSchedule;
use crate::models::window::{ScheduledSlot, TimeWindow};

/// How the slot search treats existing busy intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStrategy {
    /// Book at the window start unconditionally, ignoring conflicts. Kept
    /// for parity with the legacy scheduling behavior.
    EarliestFit,
    /// Merge every attendee's busy intervals and take the earliest gap that
    /// fits the duration.
    ConflictAware,
}

impl SlotStrategy {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "earliest_fit" => Ok(SlotStrategy::EarliestFit),
            "conflict_aware" => Ok(SlotStrategy::ConflictAware),
            other => Err(format!("Invalid slot strategy: {}", other)),
        }
    }
}

pub struct SlotService;

impl SlotService {
    /// Picks a slot of `duration_minutes` inside the window. ConflictAware is
    /// greedy earliest-fit over the merged busy intervals: optimal for
    /// "earliest acceptable time", not for minimizing disruption.
    pub fn find_slot(
        window: &TimeWindow,
        duration_minutes: i64,
        schedules: &AttendeeSchedule,
        strategy: SlotStrategy,
    ) -> Result<ScheduledSlot, SchedulerError> {
        if duration_minutes <= 0 {
            return Err(SchedulerError::InvalidDuration {
                minutes: duration_minutes,
            });
        }
        let duration = Duration::minutes(duration_minutes);
        if window.end - window.start < duration {
            return Err(SchedulerError::WindowTooShort {
                minutes: duration_minutes,
                window: window.clone(),
            });
        }

        let start = match strategy {
            SlotStrategy::EarliestFit => window.start,
            SlotStrategy::ConflictAware => earliest_gap(window, duration, schedules)?,
        };

        Ok(ScheduledSlot {
            start,
            end: start + duration,
            duration_minutes,
        })
    }
}

// Walk the gaps between merged busy intervals (window boundaries included)
// in chronological order and return the first gap start that fits.
fn earliest_gap(
    window: &TimeWindow,
    duration: Duration,
    schedules: &AttendeeSchedule,
) -> Result<DateTime<Tz>, SchedulerError> {
    let mut cursor = window.start;
    for (busy_start, busy_end) in merged_busy(window, schedules) {
        if busy_start - cursor >= duration {
            return Ok(cursor);
        }
        if busy_end > cursor {
            cursor = busy_end;
        }
    }
    if window.end - cursor >= duration {
        return Ok(cursor);
    }
    Err(SchedulerError::NoSlotAvailable {
        minutes: duration.num_minutes(),
        window: window.clone(),
    })
}

// Every attendee's intervals clipped to the window, sorted by start and
// merged where they touch or overlap.
fn merged_busy(
    window: &TimeWindow,
    schedules: &AttendeeSchedule,
) -> Vec<(DateTime<Tz>, DateTime<Tz>)> {
    let tz = window.timezone();
    let mut intervals: Vec<(DateTime<Tz>, DateTime<Tz>)> = Vec::new();
    for events in schedules.values() {
        for event in events {
            let start = event.start_time.with_timezone(&tz).max(window.start);
            let end = event.end_time.with_timezone(&tz).min(window.end);
            if start < end {
                intervals.push((start, end));
            }
        }
    }
    intervals.sort_by_key(|(start, _)| *start);

    let mut merged: Vec<(DateTime<Tz>, DateTime<Tz>)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => {
                if end > *last_end {
                    *last_end = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}
