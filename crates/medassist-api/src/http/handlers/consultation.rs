//! Consultation HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/consultation              - Transcript, form and connectivity
//! - POST   /api/v1/consultation/messages     - Dispatch a free-text message
//! - PUT    /api/v1/consultation/form         - Set parameter values
//! - POST   /api/v1/consultation/form/submit  - Compile the form and dispatch it
//! - DELETE /api/v1/consultation/form         - Cancel the open form
//! - POST   /api/v1/consultation/attachments  - Record a dropped file

use std::collections::BTreeMap;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use medassist_core::session::{SendOutcome, SessionSnapshot};
use medassist_types::connectivity::ConnectivityState;
use medassist_types::form::FormView;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

const CONSULTATION_PATH: &str = "/api/v1/consultation";
const FORM_PATH: &str = "/api/v1/consultation/form";

/// Session snapshot plus the monitor's current view of the agent.
#[derive(Debug, Serialize)]
pub struct ConsultationView {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub connectivity: ConnectivityState,
}

#[derive(Debug, Serialize)]
pub struct DispatchView {
    #[serde(flatten)]
    pub outcome: SendOutcome,
    pub consultation: ConsultationView,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FormValuesRequest {
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitFormRequest {
    #[serde(default)]
    pub values: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub file_name: String,
}

fn consultation_view(state: &AppState) -> ConsultationView {
    ConsultationView {
        snapshot: state.session.snapshot(),
        connectivity: state.connectivity(),
    }
}

/// Rejections become errors; delivered and failed dispatches are both
/// recorded in the transcript and returned as data.
fn dispatch_view(state: &AppState, outcome: SendOutcome) -> Result<DispatchView, AppError> {
    if let SendOutcome::Rejected { reason } = outcome {
        return Err(reason.into());
    }
    Ok(DispatchView {
        outcome,
        consultation: consultation_view(state),
    })
}

/// Either every value is stored or none is.
fn apply_values(state: &AppState, values: &BTreeMap<String, String>) -> Result<(), AppError> {
    state
        .session
        .set_form_values(values.iter().map(|(name, value)| (name.as_str(), value.as_str())))?;
    Ok(())
}

/// GET /api/v1/consultation - Current consultation state.
pub async fn get_consultation(
    State(state): State<AppState>,
) -> Json<ApiResponse<ConsultationView>> {
    let start = Instant::now();
    Json(
        ApiResponse::success(consultation_view(&state), start)
            .with_link("self", CONSULTATION_PATH)
            .with_link("messages", &format!("{CONSULTATION_PATH}/messages")),
    )
}

/// POST /api/v1/consultation/messages - Dispatch a message to the agent.
pub async fn post_message(
    State(state): State<AppState>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<ApiResponse<DispatchView>>, AppError> {
    let start = Instant::now();
    let outcome = state.session.send(&body.message).await;
    let view = dispatch_view(&state, outcome)?;

    Ok(Json(
        ApiResponse::success(view, start).with_link("consultation", CONSULTATION_PATH),
    ))
}

/// PUT /api/v1/consultation/form - Set one or more parameter values.
pub async fn update_form(
    State(state): State<AppState>,
    Json(body): Json<FormValuesRequest>,
) -> Result<Json<ApiResponse<Option<FormView>>>, AppError> {
    let start = Instant::now();
    apply_values(&state, &body.values)?;

    Ok(Json(
        ApiResponse::success(state.session.form(), start)
            .with_link("self", FORM_PATH)
            .with_link("submit", &format!("{FORM_PATH}/submit")),
    ))
}

/// POST /api/v1/consultation/form/submit - Compile the form and dispatch it.
pub async fn submit_form(
    State(state): State<AppState>,
    body: Option<Json<SubmitFormRequest>>,
) -> Result<Json<ApiResponse<DispatchView>>, AppError> {
    let start = Instant::now();
    if let Some(values) = body.and_then(|Json(body)| body.values) {
        apply_values(&state, &values)?;
    }

    let outcome = state.session.submit_form().await?;
    let view = dispatch_view(&state, outcome)?;

    Ok(Json(
        ApiResponse::success(view, start).with_link("consultation", CONSULTATION_PATH),
    ))
}

/// DELETE /api/v1/consultation/form - Close the open form.
pub async fn cancel_form(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let cancelled = state.session.cancel_form();
    if cancelled {
        tracing::info!("Form cancelled via API");
    }

    Json(ApiResponse::success(
        serde_json::json!({ "cancelled": cancelled }),
        start,
    ))
}

/// POST /api/v1/consultation/attachments - Record a dropped file.
pub async fn post_attachment(
    State(state): State<AppState>,
    Json(body): Json<AttachmentRequest>,
) -> Result<Json<ApiResponse<ConsultationView>>, AppError> {
    let start = Instant::now();
    state.session.attach(&body.file_name)?;

    Ok(Json(
        ApiResponse::success(consultation_view(&state), start)
            .with_link("consultation", CONSULTATION_PATH),
    ))
}
