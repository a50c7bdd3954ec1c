use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{parse_time, UpsertAvailabilityRequest};
use crate::api::dtos::responses::AvailabilityDayResponse;
use crate::domain::models::availability::AvailabilityWindow;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// All seven weekdays, Sunday first. Days without a stored window are closed.
pub async fn list_availability(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.availability_repo.list().await?;

    let week: Vec<AvailabilityDayResponse> = (0..7)
        .map(|weekday| match windows.iter().find(|w| w.weekday == weekday) {
            Some(window) => AvailabilityDayResponse::from(window),
            None => AvailabilityDayResponse::closed(weekday),
        })
        .collect();

    Ok(Json(week))
}

pub async fn upsert_availability(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(weekday): Path<i32>,
    Json(payload): Json<UpsertAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let window = AvailabilityWindow::new(
        weekday,
        payload.is_available,
        parse_time(&payload.start_time, "start_time")?,
        parse_time(&payload.end_time, "end_time")?,
    )?;

    let saved = state.availability_repo.upsert(&window).await?;
    info!("Availability for weekday {} set to {} ({} - {})", saved.weekday, saved.is_available, saved.start_time, saved.end_time);
    Ok(Json(AvailabilityDayResponse::from(&saved)))
}
