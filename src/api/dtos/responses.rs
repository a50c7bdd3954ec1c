use serde::Serialize;
use chrono::NaiveTime;

use crate::domain::models::{appointment::Appointment, availability::AvailabilityWindow};

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub service_id: String,
    pub date: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct DatesResponse {
    pub service_id: String,
    pub dates: Vec<String>,
}

#[derive(Serialize)]
pub struct AvailabilityDayResponse {
    pub weekday: i32,
    pub is_available: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl AvailabilityDayResponse {
    pub fn closed(weekday: i32) -> Self {
        Self { weekday, is_available: false, start_time: None, end_time: None }
    }
}

impl From<&AvailabilityWindow> for AvailabilityDayResponse {
    fn from(window: &AvailabilityWindow) -> Self {
        Self {
            weekday: window.weekday,
            is_available: window.is_available,
            start_time: Some(format_time(window.start_time)),
            end_time: Some(format_time(window.end_time)),
        }
    }
}

/// Returned once at booking time; the token is never serialized again.
#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub appointment: Appointment,
    pub management_token: String,
}
