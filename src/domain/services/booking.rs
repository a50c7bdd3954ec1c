use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::models::{
    appointment::{Appointment, NewAppointmentParams},
    auth::Actor,
    availability::weekday_index,
    service::Service,
};
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository, ServiceRepository};
use crate::domain::services::availability::{day_bounds_utc, local_to_utc, resolve_slots};
use crate::domain::services::slots::generate_slots;
use crate::error::AppError;

pub const MAX_DATE_RANGE_DAYS: i64 = 62;

pub struct BookingRequest {
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

/// Availability queries and the booking write path.
pub struct BookingService {
    availability_repo: Arc<dyn AvailabilityRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    timezone: Tz,
    max_horizon_days: i64,
}

impl BookingService {
    pub fn new(
        availability_repo: Arc<dyn AvailabilityRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        timezone: Tz,
        max_horizon_days: i64,
    ) -> Self {
        Self { availability_repo, service_repo, appointment_repo, timezone, max_horizon_days }
    }

    async fn find_service(&self, service_id: &str) -> Result<Service, AppError> {
        self.service_repo.find_by_id(service_id).await?
            .ok_or(AppError::NotFound("Service not found".into()))
    }

    async fn bookable_service(&self, service_id: &str) -> Result<Service, AppError> {
        let service = self.find_service(service_id).await?;
        if !service.is_active {
            return Err(AppError::InvalidRequest("Service is not bookable".into()));
        }
        Ok(service)
    }

    /// An inactive service is closed: no slots, not an error.
    pub async fn available_slots(&self, service_id: &str, date: NaiveDate, now: DateTime<Utc>) -> Result<Vec<NaiveTime>, AppError> {
        let service = self.find_service(service_id).await?;
        if !service.is_active {
            return Ok(Vec::new());
        }

        let window = self.availability_repo.find_by_weekday(weekday_index(date)).await?;
        let (day_start, day_end) = day_bounds_utc(&self.timezone, date);
        let existing = self.appointment_repo.list_active_in_range(day_start, day_end).await?;

        Ok(resolve_slots(window.as_ref(), date, service.duration_minutes, &existing, &self.timezone, now))
    }

    /// Dates in `[start, end]` that still have at least one bookable slot.
    pub async fn available_dates(&self, service_id: &str, start: NaiveDate, end: NaiveDate, now: DateTime<Utc>) -> Result<Vec<NaiveDate>, AppError> {
        if end < start {
            return Err(AppError::InvalidRequest("End date must not be before start date".into()));
        }
        if (end - start).num_days() >= MAX_DATE_RANGE_DAYS {
            return Err(AppError::InvalidRequest(format!("Date range cannot exceed {} days", MAX_DATE_RANGE_DAYS)));
        }

        let service = self.find_service(service_id).await?;
        if !service.is_active {
            return Ok(Vec::new());
        }
        let windows = self.availability_repo.list().await?;

        let (range_start, _) = day_bounds_utc(&self.timezone, start);
        let (_, range_end) = day_bounds_utc(&self.timezone, end);
        let all_existing = self.appointment_repo.list_active_in_range(range_start, range_end).await?;

        let mut dates = Vec::new();
        let mut current = start;
        while current <= end {
            let window = windows.iter().find(|w| w.weekday == weekday_index(current));
            let (day_start, day_end) = day_bounds_utc(&self.timezone, current);
            let day_existing: Vec<_> = all_existing.iter()
                .filter(|a| a.overlaps(day_start, day_end))
                .cloned()
                .collect();

            if !resolve_slots(window, current, service.duration_minutes, &day_existing, &self.timezone, now).is_empty() {
                dates.push(current);
            }
            current += Duration::days(1);
        }
        Ok(dates)
    }

    /// Validates the request, then hands it to the store's atomic
    /// check-and-insert. Losing a race surfaces as `SlotConflict`.
    pub async fn book(&self, request: BookingRequest, actor: &Actor, now: DateTime<Utc>) -> Result<Appointment, AppError> {
        let contact_name = request.contact_name.trim().to_string();
        if contact_name.is_empty() {
            return Err(AppError::InvalidRequest("Contact name is required".into()));
        }
        let contact_email = request.contact_email.trim().to_string();
        if contact_email.is_empty() {
            return Err(AppError::InvalidRequest("Contact email is required".into()));
        }
        let contact_phone = request.contact_phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let notes = request.notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let service = match self.bookable_service(&request.service_id).await {
            Err(AppError::NotFound(_)) => return Err(AppError::InvalidRequest("Unknown service".into())),
            other => other?,
        };
        let duration_minutes = service.duration_minutes;
        if duration_minutes <= 0 {
            return Err(AppError::InvalidRequest("Service duration must be positive".into()));
        }

        let start = local_to_utc(&self.timezone, request.date.and_time(request.time))
            .ok_or(AppError::InvalidRequest("Invalid local time (ambiguous or skipped due to DST)".into()))?;

        if start <= now {
            return Err(AppError::InvalidRequest("Cannot book in the past".into()));
        }
        if start > now + Duration::days(self.max_horizon_days) {
            return Err(AppError::InvalidRequest(format!("Bookings open at most {} days ahead", self.max_horizon_days)));
        }

        let window = self.availability_repo.find_by_weekday(weekday_index(request.date)).await?
            .filter(|w| w.is_available)
            .ok_or(AppError::InvalidRequest("The provider is not available on that day".into()))?;

        if !generate_slots(window.start_time, window.end_time, duration_minutes).contains(&request.time) {
            return Err(AppError::InvalidRequest("Requested time is not a bookable slot".into()));
        }

        let appointment = Appointment::new(NewAppointmentParams {
            service_id: service.id.clone(),
            client_id: actor.client_id.clone(),
            start,
            duration_minutes,
            contact_name,
            contact_email,
            contact_phone,
            notes,
        });

        match self.appointment_repo.insert_if_free(&appointment).await {
            Ok(created) => {
                info!("Appointment {} booked for {} ({} min)", created.id, created.start_at, created.duration_minutes);
                Ok(created)
            }
            Err(AppError::SlotConflict(msg)) => {
                warn!("Booking rejected, slot {} already taken", start);
                Err(AppError::SlotConflict(msg))
            }
            Err(e) => Err(e),
        }
    }
}
