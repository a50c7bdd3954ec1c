use crate::domain::models::notification::AppointmentSummary;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) invite for a confirmed appointment
pub fn generate_ics(summary: &AppointmentSummary) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&summary.service_name)
        .description(&format!("Appointment for {} ({} min)", summary.contact_name, summary.duration_minutes))
        .starts(summary.start_at)
        .ends(summary.end_at)
        .uid(&summary.appointment_id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
