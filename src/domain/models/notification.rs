use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::domain::models::appointment::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Confirmed,
    Cancelled,
    Deleted,
}

impl NotificationKind {
    pub const fn template_name(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed.html",
            Self::Cancelled => "cancelled.html",
            Self::Deleted => "deleted.html",
        }
    }

    pub const fn subject(&self) -> &'static str {
        match self {
            Self::Confirmed => "Your appointment is confirmed",
            Self::Cancelled => "Your appointment was cancelled",
            Self::Deleted => "Your appointment was removed",
        }
    }
}

/// What a notification needs to know about the appointment it concerns.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentSummary {
    pub appointment_id: String,
    pub service_name: String,
    pub contact_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl AppointmentSummary {
    pub fn new(appointment: &Appointment, service_name: &str) -> Self {
        Self {
            appointment_id: appointment.id.clone(),
            service_name: service_name.to_string(),
            contact_name: appointment.contact_name.clone(),
            start_at: appointment.start_at,
            end_at: appointment.end_at,
            duration_minutes: appointment.duration_minutes,
        }
    }
}
