#![allow(non_snake_case)]

use std::env;
use std::sync::Arc;

use meetingScheduler::cli;
use meetingScheduler::clients::calendar_client::HttpCalendarClient;
use meetingScheduler::config::{AppConfig, SchedulerConfig};
use meetingScheduler::runtime;
use meetingScheduler::service::extraction_service::OpenAIExtractor;
use meetingScheduler::service::scheduling_service::SchedulingService;
use tracing_subscriber::EnvFilter;

const DEFAULT_RUN_MODE: &str = "cli";
const DEFAULT_API_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let scheduler_config =
        SchedulerConfig::resolve(&get_prop).expect("Invalid scheduler configuration");
    let openai_api_key = get_prop("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY environment variable not set");
    let calendar_api_url = get_prop("CALENDAR_API_URL")
        .expect("CALENDAR_API_URL environment variable not set");
    let calendar_api_token = get_prop("CALENDAR_API_TOKEN").unwrap_or_default();

    let extractor = Arc::new(OpenAIExtractor::new(openai_api_key));
    let calendar = Arc::new(HttpCalendarClient::new(calendar_api_url, calendar_api_token));
    let service = Arc::new(SchedulingService::new(extractor, calendar, scheduler_config));

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let port = get_prop("API_PORT")
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);
        runtime::run_api(service, port).await;
    } else if run_mode == "cli" {
        let default_from = get_prop("MEETING_FROM");
        let default_attendees = get_prop("MEETING_ATTENDEES");
        cli::cli(service, default_from, default_attendees).await;
    } else {
        eprintln!("Invalid run mode {}", run_mode);
    }
}
