use crate::domain::models::{
    appointment::{Appointment, AppointmentFilter, AppointmentStatus},
    availability::AvailabilityWindow,
    notification::{AppointmentSummary, NotificationKind},
    service::Service,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn upsert(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow, AppError>;
    async fn find_by_weekday(&self, weekday: i32) -> Result<Option<AvailabilityWindow>, AppError>;
    async fn list(&self) -> Result<Vec<AvailabilityWindow>, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Atomically inserts the appointment unless a non-cancelled appointment
    /// overlaps `[start_at, end_at)`, in which case `AppError::SlotConflict`.
    async fn insert_if_free(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError>;
    /// Non-cancelled appointments intersecting `[start, end)`.
    async fn list_active_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError>;
    /// Compare-and-set on status. `None` when the row is gone or no longer in `expected`.
    async fn update_status(&self, id: &str, expected: AppointmentStatus, next: AppointmentStatus) -> Result<Option<Appointment>, AppError>;
    /// Removes the row and returns it, `None` if it did not exist.
    async fn delete(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    /// Marks every confirmed appointment that ended at or before `now` as completed.
    async fn complete_elapsed(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}

/// Outbound notification capability used by the appointment lifecycle.
/// Callers treat failures as non-fatal.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, recipient: &str, kind: NotificationKind, summary: &AppointmentSummary) -> Result<(), AppError>;
}
