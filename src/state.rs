use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, AvailabilityRepository, NotificationDispatcher, ServiceRepository,
};
use crate::domain::services::{booking::BookingService, lifecycle::LifecycleService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub booking_service: Arc<BookingService>,
    pub lifecycle_service: Arc<LifecycleService>,
}

impl AppState {
    /// Wires the domain services on top of the given adapters.
    pub fn new(
        config: Config,
        availability_repo: Arc<dyn AvailabilityRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let booking_service = Arc::new(BookingService::new(
            availability_repo.clone(),
            service_repo.clone(),
            appointment_repo.clone(),
            config.provider_timezone,
            config.max_booking_horizon_days,
        ));
        let lifecycle_service = Arc::new(LifecycleService::new(
            appointment_repo.clone(),
            service_repo.clone(),
            notifier,
        ));

        Self {
            config,
            availability_repo,
            service_repo,
            appointment_repo,
            booking_service,
            lifecycle_service,
        }
    }
}
