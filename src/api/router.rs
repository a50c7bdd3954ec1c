use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, service, availability, appointment, appointment_management};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalog & Availability (public)
        .route("/api/v1/services", get(service::list_services))
        .route("/api/v1/services/{service_id}", get(service::get_service))
        .route("/api/v1/services/{service_id}/slots", get(service::get_slots))
        .route("/api/v1/services/{service_id}/dates", get(service::get_available_dates))
        .route("/api/v1/availability", get(availability::list_availability))

        // Appointments
        .route("/api/v1/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/v1/appointments/{id}", get(appointment::get_appointment).delete(appointment::delete_appointment))
        .route("/api/v1/appointments/{id}/transition", post(appointment::transition_appointment))

        // Management token
        .route("/api/v1/appointments/manage/{token}", get(appointment_management::get_appointment_by_token))
        .route("/api/v1/appointments/manage/{token}/cancel", post(appointment_management::cancel_appointment_by_token))

        // Provider administration
        .route("/api/v1/admin/services", post(service::create_service))
        .route("/api/v1/admin/services/{service_id}", put(service::update_service))
        .route("/api/v1/admin/availability/{weekday}", put(availability::upsert_availability))
        .route("/api/v1/admin/appointments/complete-elapsed", post(appointment::complete_elapsed))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
