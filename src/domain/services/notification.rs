use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use tera::{Context, Tera};
use tracing::{error, info};

use crate::domain::models::notification::{AppointmentSummary, NotificationKind};
use crate::domain::ports::{EmailService, NotificationDispatcher};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;

/// Renders the per-kind template and sends it through the mail gateway.
pub struct EmailNotifier {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    timezone: Tz,
}

impl EmailNotifier {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>, timezone: Tz) -> Self {
        Self { email_service, templates, timezone }
    }

    fn render(&self, kind: NotificationKind, summary: &AppointmentSummary) -> Result<String, AppError> {
        let local_start = summary.start_at.with_timezone(&self.timezone);

        let mut context = Context::new();
        context.insert("contact_name", &summary.contact_name);
        context.insert("service_name", &summary.service_name);
        context.insert("start_time", &local_start.format("%Y-%m-%d %H:%M").to_string());
        context.insert("timezone", self.timezone.name());
        context.insert("duration", &summary.duration_minutes);
        context.insert("appointment_id", &summary.appointment_id);

        self.templates.render(kind.template_name(), &context).map_err(|e| {
            error!("Tera render error: {:?}", e);
            AppError::InternalWithMsg(format!("Tera render error: {:?}", e))
        })
    }
}

#[async_trait]
impl NotificationDispatcher for EmailNotifier {
    async fn notify(&self, recipient: &str, kind: NotificationKind, summary: &AppointmentSummary) -> Result<(), AppError> {
        let body = self.render(kind, summary)?;

        let (attachment_name, attachment_data) = if kind == NotificationKind::Confirmed {
            (Some("invite.ics"), Some(generate_ics(summary).into_bytes()))
        } else {
            (None, None)
        };

        info!("Sending {:?} email for appointment {}", kind, summary.appointment_id);
        self.email_service
            .send(recipient, kind.subject(), &body, attachment_name, attachment_data.as_deref())
            .await
    }
}
