use crate::domain::models::appointment::LifecycleEvent;
use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

pub fn parse_time(value: &str, field: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} (expected HH:MM)", field)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub service_id: String,
    /// Provider-local calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Provider-local start time, `HH:MM`.
    pub time: String,
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub contact_name: String,
    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub event: LifecycleEvent,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpsertAvailabilityRequest {
    pub is_available: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct DatesQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}
