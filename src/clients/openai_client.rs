use serde::{Deserialize, Serialize};
use reqwest;

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

pub async fn generate_openai_prompt(
    prompt: &str,
    prompt_type: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let full_prompt = match prompt_type {
        "meeting_info" => format!(
            "You are a meeting information extraction engine.\n\
             Task: From the email body below, extract:\n\
             - \"participants\": comma-separated emails of every participant mentioned in the email body; empty string if none are mentioned.\n\
             - \"time_constraints\": the timing or date phrase mentioned in the email, verbatim (e.g. \"next week\", \"Thursday\", \"tomorrow afternoon\"); empty string if the email gives none.\n\
             - \"meeting_duration\": the meeting length in minutes as an integer.\n\
             Rules:\n\
             - Copy the timing phrase as written; do NOT resolve it to a date. Downstream code does the date arithmetic.\n\
             - If the email states a duration in hours, convert it to minutes.\n\
             - If no duration is stated, use 30.\n\
             - Output ONLY raw JSON, no prose, markdown, or code fences.\n\
             - The JSON shape must be exactly:\n\
             {{\"participants\":\"<string>\",\"time_constraints\":\"<string>\",\"meeting_duration\":<integer>}}\n\
             Email body: \"{email}\"",
            email = prompt
        ),
        _ => return Err("Not a valid base prompt".to_string().into()),
    };

    query_openai(full_prompt, prompt_type, api_key).await
}

async fn query_openai(
    prompt: String,
    prompt_type: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let system_message = match prompt_type {
        "meeting_info" => {
            "You are a strict JSON meeting information extraction engine. You read instructions and an email body and reply ONLY with a single JSON object, with no markdown, no backticks, and no extra text. You copy timing phrases verbatim and never resolve them to concrete dates."
        }
        _ => "You are a helpful assistant.",
    };

    let request: OpenAIRequest = OpenAIRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: system_message.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: prompt,
            },
        ],
        max_tokens: 500,
        temperature: 0.2,
    };

    let client = reqwest::Client::new();
    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        tracing::warn!(status = %status, body = %text, "OpenAI request failed");
        return Err(format!("Request failed with status {}", status).into());
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, text))?;

    if let Some(choice) = parsed.choices.first() {
        Ok(choice.message.content.clone())
    } else {
        tracing::warn!(body = %text, "no choices found in OpenAI response");
        Err("No response from OpenAI".to_string().into())
    }
}
