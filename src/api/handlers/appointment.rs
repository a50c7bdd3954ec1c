use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::{AdminUser, AuthUser}, maybe_auth::MaybeActor};
use crate::api::dtos::requests::{parse_date, parse_time, CreateAppointmentRequest, TransitionRequest};
use crate::api::dtos::responses::BookingCreatedResponse;
use crate::domain::models::appointment::AppointmentFilter;
use crate::domain::services::booking::BookingRequest;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let request = BookingRequest {
        service_id: payload.service_id,
        date: parse_date(&payload.date, "date")?,
        time: parse_time(&payload.time, "time")?,
        contact_name: payload.contact_name,
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        notes: payload.notes,
    };

    let created = state.booking_service.book(request, &actor, Utc::now()).await?;
    let management_token = created.management_token.clone();

    Ok((StatusCode::CREATED, Json(BookingCreatedResponse {
        appointment: created,
        management_token,
    })))
}

/// Admins see everything matching the filter; clients see their own bookings.
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(filter): Query<AppointmentFilter>,
) -> Result<impl IntoResponse, AppError> {
    if actor.is_admin {
        return Ok(Json(state.appointment_repo.list(&filter).await?));
    }

    let client_id = actor.client_id.as_deref().ok_or(AppError::Unauthorized)?;
    let appointments = state.appointment_repo.list_by_client(client_id).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if !actor.owns(appointment.client_id.as_deref()) {
        return Err(AppError::Forbidden("You can only view your own appointments".into()));
    }
    Ok(Json(appointment))
}

pub async fn transition_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.lifecycle_service.transition(&id, payload.event, &actor).await?;
    Ok(Json(updated))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.lifecycle_service.delete(&id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_elapsed(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let completed = state.lifecycle_service.complete_elapsed(Utc::now()).await?;
    info!("Manual completion sweep finished: {}", completed);
    Ok(Json(json!({ "completed": completed })))
}
