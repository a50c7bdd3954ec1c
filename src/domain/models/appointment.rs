use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct UnknownStatus(pub String);

impl AppointmentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether an appointment in this status still occupies its interval.
    pub const fn blocks_timeline(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// The transition table. `Ok(None)` means the event is accepted but the
    /// status does not change (repeated cancel).
    pub fn apply(self, event: LifecycleEvent) -> Result<Option<AppointmentStatus>, AppError> {
        match (self, event) {
            (Self::Pending, LifecycleEvent::Confirm) => Ok(Some(Self::Confirmed)),
            (Self::Pending | Self::Confirmed, LifecycleEvent::Cancel) => Ok(Some(Self::Cancelled)),
            (Self::Cancelled, LifecycleEvent::Cancel) => Ok(None),
            (Self::Confirmed, LifecycleEvent::Complete) => Ok(Some(Self::Completed)),
            (from, event) => Err(AppError::InvalidTransition { from, event }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Status-changing events. Hard delete is not an event: it removes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Confirm,
    Cancel,
    Complete,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        })
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub service_id: String,
    pub client_id: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    #[serde(skip_serializing)]
    pub management_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub service_id: String,
    pub client_id: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let end_at = params.start + Duration::minutes(params.duration_minutes as i64);

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            service_id: params.service_id,
            client_id: params.client_id,
            contact_name: params.contact_name,
            contact_email: params.contact_email,
            contact_phone: params.contact_phone,
            start_at: params.start,
            end_at,
            duration_minutes: params.duration_minutes,
            notes: params.notes,
            status: AppointmentStatus::Pending,
            management_token: token,
            created_at: now,
            updated_at: now,
        }
    }

    /// Half-open interval overlap: touching appointments do not collide.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_at < end && start < self.end_at
    }
}

/// Admin listing filter; all bounds optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AppointmentFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
}
