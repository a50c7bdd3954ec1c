use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AdminUser, maybe_auth::MaybeActor};
use crate::api::dtos::requests::{parse_date, CreateServiceRequest, DatesQuery, SlotsQuery, UpdateServiceRequest};
use crate::api::dtos::responses::{format_time, DatesResponse, SlotsResponse};
use crate::domain::models::service::Service;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list(actor.is_admin).await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_id(&service_id).await?
        .filter(|s| s.is_active || actor.is_admin)
        .ok_or(AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = Service::new(
        payload.name.trim().to_string(),
        payload.description,
        payload.duration_minutes,
        payload.price_cents,
    )?;

    let created = state.service_repo.create(&service).await?;
    info!("Service created: {} ({} min)", created.name, created.duration_minutes);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(service_id): Path<String>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut service = state.service_repo.find_by_id(&service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if let Some(name) = payload.name { service.name = name.trim().to_string(); }
    if let Some(description) = payload.description { service.description = Some(description); }
    if let Some(duration) = payload.duration_minutes { service.duration_minutes = duration; }
    if let Some(price) = payload.price_cents { service.price_cents = Some(price); }
    if let Some(active) = payload.is_active { service.is_active = active; }
    service.updated_at = Utc::now();
    service.validate()?;

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date_str = params.date.ok_or(AppError::InvalidRequest("date is required".into()))?;
    let date = parse_date(&date_str, "date")?;

    let slots = state.booking_service.available_slots(&service_id, date, Utc::now()).await?;

    Ok(Json(SlotsResponse {
        service_id,
        date: date.to_string(),
        slots: slots.into_iter().map(format_time).collect(),
    }))
}

pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
    Query(params): Query<DatesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_date(params.start.as_deref().ok_or(AppError::InvalidRequest("start is required".into()))?, "start")?;
    let end = parse_date(params.end.as_deref().ok_or(AppError::InvalidRequest("end is required".into()))?, "end")?;

    let dates = state.booking_service.available_dates(&service_id, start, end, Utc::now()).await?;

    Ok(Json(DatesResponse {
        service_id,
        dates: dates.into_iter().map(|d| d.to_string()).collect(),
    }))
}
