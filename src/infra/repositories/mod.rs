pub mod sqlite_availability_repo;
pub mod sqlite_service_repo;
pub mod sqlite_appointment_repo;

pub mod postgres_availability_repo;
pub mod postgres_service_repo;
pub mod postgres_appointment_repo;
