use crate::domain::{
    models::appointment::{Appointment, AppointmentFilter, AppointmentStatus},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    /// The overlap check and the insert run as one statement. SQLite takes the
    /// write lock before evaluating it, so concurrent bookings serialize here.
    async fn insert_if_free(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, service_id, client_id, contact_name, contact_email, contact_phone, start_at, end_at, duration_minutes, notes, status, management_token, created_at, updated_at)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments WHERE status != 'cancelled' AND start_at < ?8 AND end_at > ?7
             )
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.service_id).bind(&appointment.client_id)
            .bind(&appointment.contact_name).bind(&appointment.contact_email).bind(&appointment.contact_phone)
            .bind(appointment.start_at).bind(appointment.end_at).bind(appointment.duration_minutes)
            .bind(&appointment.notes).bind(appointment.status.as_str()).bind(&appointment.management_token)
            .bind(appointment.created_at).bind(appointment.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_insert)?;

        created.ok_or(AppError::SlotConflict("The requested time overlaps an existing appointment".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE management_token = ?").bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE start_at < ? AND end_at > ? AND status != 'cancelled' ORDER BY start_at ASC")
            .bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE (?1 IS NULL OR end_at > ?1)
               AND (?2 IS NULL OR start_at < ?2)
               AND (?3 IS NULL OR status = ?3)
             ORDER BY start_at ASC"
        )
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE client_id = ? ORDER BY start_at ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, expected: AppointmentStatus, next: AppointmentStatus) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ? AND status = ? RETURNING *")
            .bind(next.as_str()).bind(Utc::now()).bind(id).bind(expected.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("DELETE FROM appointments WHERE id = ? RETURNING *").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn complete_elapsed(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE appointments SET status = 'completed', updated_at = ? WHERE status = 'confirmed' AND end_at <= ?")
            .bind(Utc::now()).bind(now)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
