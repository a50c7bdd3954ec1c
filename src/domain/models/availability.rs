use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

/// Weekday numbering used by the availability store: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// The recurring opening hours for one weekday. There is at most one row per
/// weekday; rows are toggled, never deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct AvailabilityWindow {
    pub weekday: i32,
    pub is_available: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn new(weekday: i32, is_available: bool, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, AppError> {
        if !(0..=6).contains(&weekday) {
            return Err(AppError::InvalidRequest(format!("Weekday must be between 0 and 6, got {}", weekday)));
        }
        if is_available && start_time >= end_time {
            return Err(AppError::InvalidRequest("Window start must be before its end".into()));
        }

        Ok(Self {
            weekday,
            is_available,
            start_time,
            end_time,
            updated_at: Utc::now(),
        })
    }
}
