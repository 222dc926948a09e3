use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::exec::process_coverage;
use crate::server::AppState;

/// Format of the `Now` timestamp, local time with milliseconds.
pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Serialize)]
pub struct InitPayload {
    #[serde(rename = "Now")]
    pub now: String,
}

/// Long-poll until the next successful build. No timeout.
pub async fn wait(State(state): State<AppState>) -> StatusCode {
    let waiter = state.waiters.register();
    waiter.wait().await;
    debug!("long-poll released");
    StatusCode::OK
}

pub async fn init() -> Json<InitPayload> {
    Json(InitPayload {
        now: chrono::Local::now().format(NOW_FORMAT).to_string(),
    })
}

/// Always answers 200; pipeline errors only show up in the log.
pub async fn coverage(State(state): State<AppState>, body: Bytes) -> StatusCode {
    process_coverage(&state.coverage, &body).await;
    StatusCode::OK
}
