use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

/// A bookable service. Appointments copy `duration_minutes` at booking time,
/// so editing a service never moves the end of an existing appointment.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(name: String, description: Option<String>, duration_minutes: i32, price_cents: Option<i64>) -> Result<Self, AppError> {
        let now = Utc::now();
        let service = Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            duration_minutes,
            price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        service.validate()?;
        Ok(service)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidRequest("Service name is required".into()));
        }
        if self.duration_minutes <= 0 {
            return Err(AppError::InvalidRequest("Service duration must be a positive number of minutes".into()));
        }
        if self.duration_minutes > 24 * 60 {
            return Err(AppError::InvalidRequest("Service duration cannot exceed one day".into()));
        }
        if self.price_cents.is_some_and(|p| p < 0) {
            return Err(AppError::InvalidRequest("Service price cannot be negative".into()));
        }
        Ok(())
    }
}
