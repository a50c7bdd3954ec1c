pub mod appointment;
pub mod appointment_management;
pub mod availability;
pub mod health;
pub mod service;
