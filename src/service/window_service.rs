use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::SchedulerError;
use crate::models::window::TimeWindow;

pub const WORK_DAY_START_HOUR: u32 = 9;
pub const WORK_DAY_END_HOUR: u32 = 17;

/// Classified scheduling intent of a time-constraint phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeConstraint {
    NextWeek,
    Weekday(Weekday),
    NextBusinessDay,
}

// Checked in order; "next week" outranks any weekday named in the same
// phrase, and only these four weekdays are recognized. Both quirks match the
// upstream extraction contract, so keep the list in this order.
const WEEKDAY_RULES: [(&str, Weekday); 4] = [
    ("thursday", Weekday::Thu),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("monday", Weekday::Mon),
];

/// Single-pass keyword classifier. Unrecognized phrases are not an error,
/// they fall through to the next-business-day default.
pub fn classify_constraint(phrase: &str) -> TimeConstraint {
    let lower = phrase.to_lowercase();
    if lower.contains("next week") {
        return TimeConstraint::NextWeek;
    }
    for (token, day) in WEEKDAY_RULES {
        if lower.contains(token) {
            return TimeConstraint::Weekday(day);
        }
    }
    TimeConstraint::NextBusinessDay
}

pub struct WindowService;

impl WindowService {
    /// Turns a time-constraint phrase plus a reference instant into a concrete
    /// business-hours window in the target zone.
    ///
    /// Weekday phrases land on the next future occurrence of that day (never
    /// today), "next week" spans next Monday 09:00 through Friday 17:00, and
    /// everything else falls back to tomorrow 09:00-17:00.
    pub fn resolve(
        now: DateTime<Utc>,
        phrase: &str,
        duration_minutes: i64,
        tz: Tz,
    ) -> Result<TimeWindow, SchedulerError> {
        if duration_minutes <= 0 {
            return Err(SchedulerError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let today = now.with_timezone(&tz).date_naive();
        let (start_day, end_day) = match classify_constraint(phrase) {
            TimeConstraint::NextWeek => {
                let monday = next_occurrence(today, Weekday::Mon);
                (monday, monday + Duration::days(4))
            }
            TimeConstraint::Weekday(day) => {
                let date = next_occurrence(today, day);
                (date, date)
            }
            TimeConstraint::NextBusinessDay => {
                let date = today + Duration::days(1);
                (date, date)
            }
        };

        Ok(TimeWindow {
            start: localize(tz, at_hour(start_day, WORK_DAY_START_HOUR)),
            end: localize(tz, at_hour(end_day, WORK_DAY_END_HOUR)),
        })
    }
}

// Days until the next occurrence of `target` on a Monday-indexed week. A
// non-positive offset means this week's occurrence is today or gone, so jump
// a full week ahead.
fn next_occurrence(today: NaiveDate, target: Weekday) -> NaiveDate {
    let mut days_ahead =
        target.num_days_from_monday() as i64 - today.weekday().num_days_from_monday() as i64;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    today + Duration::days(days_ahead)
}

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).expect("valid wall-clock hour")
}

// Wall-clock localization. A DST-ambiguous time takes the earlier offset; a
// time inside a spring-forward gap is read as UTC-anchored wall clock.
fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    // Reference instant used throughout: Wednesday 2025-07-09, 12:34:55 IST.
    fn reference_now() -> DateTime<Utc> {
        Kolkata
            .with_ymd_and_hms(2025, 7, 9, 12, 34, 55)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn classify_recognizes_next_week_first() {
        assert_eq!(classify_constraint("next week"), TimeConstraint::NextWeek);
        // Fixed precedence: "next week" wins even when a weekday follows.
        assert_eq!(
            classify_constraint("meet before next week on Thursday"),
            TimeConstraint::NextWeek
        );
    }

    #[test]
    fn classify_recognizes_weekdays_case_insensitively() {
        assert_eq!(
            classify_constraint("Thursday works best"),
            TimeConstraint::Weekday(Weekday::Thu)
        );
        assert_eq!(
            classify_constraint("tuesday"),
            TimeConstraint::Weekday(Weekday::Tue)
        );
        assert_eq!(
            classify_constraint("on WEDNESDAY please"),
            TimeConstraint::Weekday(Weekday::Wed)
        );
        assert_eq!(
            classify_constraint("monday morning"),
            TimeConstraint::Weekday(Weekday::Mon)
        );
    }

    #[test]
    fn classify_falls_back_on_unrecognized_phrases() {
        assert_eq!(
            classify_constraint("sometime soon"),
            TimeConstraint::NextBusinessDay
        );
        assert_eq!(classify_constraint(""), TimeConstraint::NextBusinessDay);
        // Friday is outside the recognized weekday set.
        assert_eq!(
            classify_constraint("friday"),
            TimeConstraint::NextBusinessDay
        );
    }

    #[test]
    fn thursday_phrase_resolves_to_next_thursday_business_hours() {
        let window = WindowService::resolve(reference_now(), "thursday", 30, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 10, 9, 0, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Kolkata.with_ymd_and_hms(2025, 7, 10, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn weekday_matching_today_skips_to_next_week() {
        // 2025-07-10 is itself a Thursday.
        let now = Kolkata
            .with_ymd_and_hms(2025, 7, 10, 8, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let window = WindowService::resolve(now, "thursday", 30, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 17, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn weekday_already_passed_this_week_lands_next_week() {
        // Friday 2025-07-11 asking for monday: three days ahead.
        let now = Kolkata
            .with_ymd_and_hms(2025, 7, 11, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let window = WindowService::resolve(now, "monday", 45, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 14, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_week_spans_monday_through_friday() {
        let window = WindowService::resolve(reference_now(), "next week", 60, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 14, 9, 0, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Kolkata.with_ymd_and_hms(2025, 7, 18, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_week_from_a_monday_still_jumps_a_full_week() {
        let now = Kolkata
            .with_ymd_and_hms(2025, 7, 14, 9, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        let window = WindowService::resolve(now, "next week", 30, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 21, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn unrecognized_phrase_defaults_to_next_business_day() {
        let window =
            WindowService::resolve(reference_now(), "sometime soon", 30, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 7, 10, 9, 0, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Kolkata.with_ymd_and_hms(2025, 7, 10, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn default_fallback_crosses_month_boundaries() {
        let now = Kolkata
            .with_ymd_and_hms(2025, 7, 31, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let window = WindowService::resolve(now, "whenever", 30, Kolkata).unwrap();
        assert_eq!(
            window.start,
            Kolkata.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn window_start_is_strictly_after_now() {
        for phrase in ["next week", "thursday", "tuesday", "wednesday", "monday", "soon"] {
            let window = WindowService::resolve(reference_now(), phrase, 30, Kolkata).unwrap();
            assert!(window.start.with_timezone(&Utc) > reference_now(), "{}", phrase);
            assert!(window.end > window.start, "{}", phrase);
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        let first = WindowService::resolve(reference_now(), "thursday", 30, Kolkata).unwrap();
        let second = WindowService::resolve(reference_now(), "thursday", 30, Kolkata).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn window_carries_the_target_zone_offset() {
        let window = WindowService::resolve(reference_now(), "thursday", 30, Kolkata).unwrap();
        assert_eq!(window.start.to_rfc3339(), "2025-07-10T09:00:00+05:30");
        assert_eq!(window.end.to_rfc3339(), "2025-07-10T17:00:00+05:30");
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let err = WindowService::resolve(reference_now(), "thursday", 0, Kolkata).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidDuration { minutes: 0 }));
        let err = WindowService::resolve(reference_now(), "thursday", -15, Kolkata).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidDuration { minutes: -15 }));
    }
}
