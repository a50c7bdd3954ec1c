use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus, LifecycleEvent},
    auth::Actor,
    notification::{AppointmentSummary, NotificationKind},
};
use crate::domain::ports::{AppointmentRepository, NotificationDispatcher, ServiceRepository};
use crate::error::AppError;

/// Status changes after booking: confirm, cancel, complete and hard delete.
pub struct LifecycleService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl LifecycleService {
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { appointment_repo, service_repo, notifier }
    }

    pub async fn transition(&self, id: &str, event: LifecycleEvent, actor: &Actor) -> Result<Appointment, AppError> {
        let appointment = self.appointment_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        if !actor.is_admin {
            if event != LifecycleEvent::Cancel {
                return Err(AppError::Forbidden(format!("Only the provider can {} appointments", event)));
            }
            if !actor.owns(appointment.client_id.as_deref()) {
                return Err(AppError::Forbidden("You can only cancel your own appointments".into()));
            }
        }

        self.apply(appointment, event).await
    }

    /// Cancel on behalf of whoever holds the management token.
    pub async fn cancel_with_token(&self, token: &str) -> Result<Appointment, AppError> {
        let appointment = self.appointment_repo.find_by_token(token).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        self.apply(appointment, LifecycleEvent::Cancel).await
    }

    pub async fn delete(&self, id: &str, actor: &Actor) -> Result<Appointment, AppError> {
        if !actor.is_admin {
            return Err(AppError::Forbidden("Only the provider can delete appointments".into()));
        }

        let removed = self.appointment_repo.delete(id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        info!("Appointment {} deleted (was {})", removed.id, removed.status);
        self.notify(&removed, NotificationKind::Deleted).await;
        Ok(removed)
    }

    /// Marks confirmed appointments whose end has passed as completed.
    pub async fn complete_elapsed(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let count = self.appointment_repo.complete_elapsed(now).await?;
        if count > 0 {
            info!("Completed {} elapsed appointments", count);
        }
        Ok(count)
    }

    async fn apply(&self, appointment: Appointment, event: LifecycleEvent) -> Result<Appointment, AppError> {
        let mut current = appointment;

        // One retry: another writer may have moved the record between our read and the CAS.
        for _ in 0..2 {
            let Some(next) = current.status.apply(event)? else {
                return Ok(current);
            };

            if let Some(updated) = self.appointment_repo.update_status(&current.id, current.status, next).await? {
                info!("Appointment {}: {} -> {}", updated.id, current.status, updated.status);
                if let Some(kind) = notification_for(next) {
                    self.notify(&updated, kind).await;
                }
                return Ok(updated);
            }

            current = self.appointment_repo.find_by_id(&current.id).await?
                .ok_or(AppError::NotFound("Appointment not found".into()))?;
        }

        match current.status.apply(event)? {
            None => Ok(current),
            Some(_) => Err(AppError::InvalidTransition { from: current.status, event }),
        }
    }

    /// Delivery failures are logged and never undo the state change.
    async fn notify(&self, appointment: &Appointment, kind: NotificationKind) {
        let service_name = match self.service_repo.find_by_id(&appointment.service_id).await {
            Ok(Some(service)) => service.name,
            _ => appointment.service_id.clone(),
        };
        let summary = AppointmentSummary::new(appointment, &service_name);

        if let Err(e) = self.notifier.notify(&appointment.contact_email, kind, &summary).await {
            warn!("Failed to send {:?} notification for appointment {}: {}", kind, appointment.id, e);
        }
    }
}

fn notification_for(status: AppointmentStatus) -> Option<NotificationKind> {
    match status {
        AppointmentStatus::Confirmed => Some(NotificationKind::Confirmed),
        AppointmentStatus::Cancelled => Some(NotificationKind::Cancelled),
        _ => None,
    }
}
