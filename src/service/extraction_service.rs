use async_trait::async_trait;

use crate::clients::openai_client;
use crate::models::meeting::MeetingInfo;

/// Pulls structured meeting intent out of a free-text email body.
#[async_trait]
pub trait MeetingExtractor: Send + Sync {
    async fn extract(
        &self,
        email_content: &str,
    ) -> Result<MeetingInfo, Box<dyn std::error::Error + Send + Sync>>;
}

/// Model-backed extractor. Falls back to the keyword heuristic when the call
/// fails or the payload does not parse, so extraction itself never aborts a
/// request.
pub struct OpenAIExtractor {
    api_key: String,
}

impl OpenAIExtractor {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl MeetingExtractor for OpenAIExtractor {
    async fn extract(
        &self,
        email_content: &str,
    ) -> Result<MeetingInfo, Box<dyn std::error::Error + Send + Sync>> {
        match openai_client::generate_openai_prompt(email_content, "meeting_info", &self.api_key)
            .await
        {
            Ok(payload) => match serde_json::from_str::<MeetingInfo>(&payload) {
                Ok(info) => Ok(info),
                Err(err) => {
                    tracing::warn!(error = %err, "meeting info payload did not parse, using heuristic extraction");
                    Ok(heuristic_extract(email_content))
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "OpenAI extraction failed, using heuristic extraction");
                Ok(heuristic_extract(email_content))
            }
        }
    }
}

/// Deterministic keyword extractor, also usable on its own in tests and
/// offline runs.
pub struct HeuristicExtractor;

#[async_trait]
impl MeetingExtractor for HeuristicExtractor {
    async fn extract(
        &self,
        email_content: &str,
    ) -> Result<MeetingInfo, Box<dyn std::error::Error + Send + Sync>> {
        Ok(heuristic_extract(email_content))
    }
}

const DEFAULT_DURATION_MINS: i64 = 30;

pub fn heuristic_extract(email_content: &str) -> MeetingInfo {
    MeetingInfo {
        // Participants come from the request envelope, not the email body.
        participants: String::new(),
        time_constraints: time_phrase(email_content),
        meeting_duration: duration_minutes(email_content),
    }
}

fn time_phrase(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains("next week") {
        return "next week".to_string();
    }
    let weekdays = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    for day in weekdays {
        if lower.contains(day) {
            return day.to_string();
        }
    }
    String::new()
}

fn duration_minutes(text: &str) -> i64 {
    let lower = text.to_lowercase();
    for marker in ["minutes", "mins", "min"] {
        if let Some(idx) = lower.find(marker) {
            if let Some(minutes) = number_before(&lower[..idx]) {
                return minutes;
            }
        }
    }
    if lower.contains("an hour") || lower.contains("one hour") || lower.contains("1 hour") {
        return 60;
    }
    DEFAULT_DURATION_MINS
}

// The trailing integer in front of a duration marker, e.g. "for 30 " -> 30.
fn number_before(text: &str) -> Option<i64> {
    let digits: String = text
        .chars()
        .rev()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let value: String = digits.chars().rev().collect();
    value.parse::<i64>().ok().filter(|minutes| *minutes > 0)
}
