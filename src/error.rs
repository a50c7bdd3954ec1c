use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::models::appointment::{AppointmentStatus, LifecycleEvent};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Slot conflict: {0}")]
    SlotConflict(String),
    #[error("Cannot {event} an appointment that is {from}")]
    InvalidTransition {
        from: AppointmentStatus,
        event: LifecycleEvent,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Maps a failed appointment insert to `SlotConflict` when the store's own
    /// constraint rejected it.
    ///
    /// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation,
    /// 23P01 = PostgreSQL exclusion violation.
    pub fn from_insert(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let code = db_err.code().unwrap_or_default();
            if code == "2067" || code == "23505" || code == "23P01" {
                return AppError::SlotConflict("The requested time overlaps an existing appointment".into());
            }
        }
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::SlotConflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidTransition { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
