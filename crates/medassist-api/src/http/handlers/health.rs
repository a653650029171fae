//! Proxy health handler.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use medassist_core::monitor::probe;
use medassist_types::connectivity::ConnectivityState;

use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub version: &'static str,
    pub agent_url: String,
    /// Result of a probe made for this request.
    pub agent: ConnectivityState,
    /// Last state published by the background monitor.
    pub connectivity: ConnectivityState,
}

/// GET /api/v1/health - Proxy liveness plus agent reachability.
pub async fn get_health(State(state): State<AppState>) -> Json<ApiResponse<HealthView>> {
    let start = Instant::now();
    let agent = probe(&state.transport, state.config.monitor.probe_timeout()).await;

    let view = HealthView {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        agent_url: state.transport.base_url().to_string(),
        agent,
        connectivity: state.connectivity(),
    };
    Json(ApiResponse::success(view, start).with_link("self", "/api/v1/health"))
}
