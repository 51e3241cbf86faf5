use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use warp::Filter;

use crate::models::meeting::MeetingRequest;
use crate::service::scheduling_service::SchedulingService;

/// Serves the scheduling pipeline over HTTP: POST /schedule takes a meeting
/// request body and always answers with the best-effort scheduling record.
pub async fn run_api(service: Arc<SchedulingService>, port: u16) {
    let with_service = warp::any().map(move || service.clone());
    let schedule = warp::path("schedule")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_service)
        .and_then(handle_schedule);

    info!(port, "scheduling API listening");
    warp::serve(schedule).run(([0, 0, 0, 0], port)).await;
}

async fn handle_schedule(
    request: MeetingRequest,
    service: Arc<SchedulingService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let response = service.schedule(request, Utc::now()).await;
    Ok(warp::reply::json(&response))
}
