use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

pub async fn get_appointment_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    let service = state.service_repo.find_by_id(&appointment.service_id).await?;

    Ok(Json(json!({
        "appointment": appointment,
        "service": service,
    })))
}

pub async fn cancel_appointment_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.lifecycle_service.cancel_with_token(&token).await?;
    info!("Appointment cancelled via management token: {}", cancelled.id);
    Ok(Json(cancelled))
}
