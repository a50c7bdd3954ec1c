use crate::domain::{models::availability::AvailabilityWindow, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn upsert(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>(
            r#"INSERT INTO availability_windows (weekday, is_available, start_time, end_time, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(weekday) DO UPDATE SET
               is_available=excluded.is_available,
               start_time=excluded.start_time,
               end_time=excluded.end_time,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(window.weekday)
            .bind(window.is_available)
            .bind(window.start_time)
            .bind(window.end_time)
            .bind(window.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_weekday(&self, weekday: i32) -> Result<Option<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>("SELECT * FROM availability_windows WHERE weekday = ?")
            .bind(weekday)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>("SELECT * FROM availability_windows ORDER BY weekday ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
