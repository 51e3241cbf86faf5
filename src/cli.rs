use clap::{Parser, Subcommand};
use chrono::Utc;
use inquire::Text;
use serde_json;
use std::fs;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::meeting::{AttendeeRef, MeetingRequest};
use crate::service::scheduling_service::SchedulingService;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a meeting from a request JSON file.
    Schedule { file: String },
    /// Schedule a meeting interactively from a pasted email.
    SchedulePrompt {},
}

pub async fn cli(
    service: Arc<SchedulingService>,
    default_from: Option<String>,
    default_attendees: Option<String>,
) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Schedule { file } => match schedule_from_file(&service, file).await {
            Ok(output) => println!("{}", output),
            Err(e) => println!("Failed to schedule meeting: {}", e),
        },
        Commands::SchedulePrompt {} => {
            match schedule_from_prompt(
                &service,
                default_from.as_deref(),
                default_attendees.as_deref(),
            )
            .await
            {
                Ok(output) => println!("{}", output),
                Err(e) => println!("Failed to schedule meeting from prompt: {}", e),
            }
        }
    }
}

async fn schedule_from_file(
    service: &SchedulingService,
    path: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let request: MeetingRequest = serde_json::from_str(&content)?;
    let response = service.schedule(request, Utc::now()).await;
    Ok(serde_json::to_string_pretty(&response)?)
}

async fn schedule_from_prompt(
    service: &SchedulingService,
    default_from: Option<&str>,
    default_attendees: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let from = match default_from {
        Some(value) => value.to_string(),
        None => Text::new("Organizer email.").prompt()?,
    };
    let attendees_csv = match default_attendees {
        Some(value) => value.to_string(),
        None => Text::new("Attendee emails (comma separated).").prompt()?,
    };
    let subject = Text::new("Meeting subject.").prompt()?;
    let email_content = Text::new("Paste the meeting email.").prompt()?;

    let attendees: Vec<AttendeeRef> = attendees_csv
        .split(',')
        .map(|email| AttendeeRef {
            email: email.trim().to_string(),
        })
        .filter(|attendee| !attendee.email.is_empty())
        .collect();

    let request = MeetingRequest {
        request_id: Uuid::new_v4().to_string(),
        from,
        attendees,
        subject,
        email_content,
        extra: serde_json::Map::new(),
    };
    let response = service.schedule(request, Utc::now()).await;
    Ok(serde_json::to_string_pretty(&response)?)
}

// Defaults for organizer and attendees are resolved in main.rs and passed into cli().
