mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{next_weekday, parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_booking_creates_pending_appointment_and_removes_slot() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let response = app.book(&service_id, monday, "09:00", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_body(response).await;
    let appointment = &body["appointment"];
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["service_id"], service_id.as_str());
    assert_eq!(appointment["duration_minutes"], 60);
    assert_eq!(appointment["contact_email"], "alice@example.com");
    assert!(appointment["client_id"].is_null());
    assert!(appointment.get("management_token").is_none());
    assert_eq!(body["management_token"].as_str().unwrap().len(), 48);

    let start = monday.and_hms_opt(9, 0, 0).unwrap().and_utc();
    let end = start + Duration::minutes(60);
    assert_eq!(appointment["start_at"].as_str().unwrap().parse::<chrono::DateTime<Utc>>().unwrap(), start);
    assert_eq!(appointment["end_at"].as_str().unwrap().parse::<chrono::DateTime<Utc>>().unwrap(), end);

    assert_eq!(app.slots(&service_id, monday).await, vec!["10:00", "11:00"]);
}

#[tokio::test]
async fn test_overlapping_booking_is_a_conflict() {
    let app = TestApp::new().await;
    let long = app.create_service("Long session", 90).await;
    let short = app.create_service("Short session", 30).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let response = app.book(&long, monday, "09:00", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // 10:00 - 10:30 starts inside 09:00 - 10:30
    let response = app.book(&short, monday, "10:00", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(parse_body(response).await["error"].is_string());

    // Touching the end is fine
    let response = app.book(&short, monday, "10:30", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_identical_resubmission_is_rejected() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    assert_eq!(app.book(&service_id, monday, "11:00", None).await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&service_id, monday, "11:00", None).await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_authenticated_booking_records_client() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;

    let client = app.client("client-42");
    let response = app.book(&service_id, next_weekday(1), "10:00", Some(&client)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(parse_body(response).await["appointment"]["client_id"], "client-42");
}

#[tokio::test]
async fn test_authenticated_booking_requires_csrf_header() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;

    let mut client = app.client("client-42");
    client.csrf_token = "forged".into();
    let response = app.book(&service_id, next_weekday(1), "10:00", Some(&client)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_booking_input_validation() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let cases = vec![
        json!({ "service_id": service_id, "date": monday.to_string(), "time": "09:00", "contact_name": "", "contact_email": "a@example.com" }),
        json!({ "service_id": service_id, "date": monday.to_string(), "time": "09:00", "contact_name": "Al", "contact_email": "not-an-email" }),
        json!({ "service_id": service_id, "date": "2030/01/07", "time": "09:00", "contact_name": "Al", "contact_email": "a@example.com" }),
        json!({ "service_id": service_id, "date": monday.to_string(), "time": "nine", "contact_name": "Al", "contact_email": "a@example.com" }),
        json!({ "service_id": "missing", "date": monday.to_string(), "time": "09:00", "contact_name": "Al", "contact_email": "a@example.com" }),
        // Not on the slot grid
        json!({ "service_id": service_id, "date": monday.to_string(), "time": "09:30", "contact_name": "Al", "contact_email": "a@example.com" }),
        // Runs past the window end
        json!({ "service_id": service_id, "date": monday.to_string(), "time": "12:00", "contact_name": "Al", "contact_email": "a@example.com" }),
        // Tuesday has no window
        json!({ "service_id": service_id, "date": next_weekday(2).to_string(), "time": "09:00", "contact_name": "Al", "contact_email": "a@example.com" }),
    ];

    for payload in cases {
        let response = app.request("POST", "/api/v1/appointments", Some(payload.clone()), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {} should be rejected", payload);
    }

    // Nothing was written
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments").fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_past_and_far_future_bookings_are_rejected() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    for weekday in 0..7 {
        app.set_window(weekday, "09:00", "12:00").await;
    }

    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let response = app.book(&service_id, yesterday, "09:00", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let beyond_horizon = Utc::now().date_naive() + Duration::days(200);
    let response = app.book(&service_id, beyond_horizon, "09:00", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inactive_service_cannot_be_booked() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Retired", 60).await;
    app.set_window(1, "09:00", "12:00").await;

    let response = app.request(
        "PUT",
        &format!("/api/v1/admin/services/{}", service_id),
        Some(json!({ "is_active": false })),
        Some(&app.admin()),
    ).await;
    assert_eq!(response.status(), StatusCode::OK);

    let monday = next_weekday(1);
    let response = app.book(&service_id, monday, "09:00", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A retired service reads as closed, not as a bad request
    assert!(app.slots(&service_id, monday).await.is_empty());

    let response = app.request(
        "GET",
        &format!("/api/v1/services/{}/dates?start={}&end={}", service_id, monday, monday + Duration::days(6)),
        None,
        None,
    ).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["dates"], json!([]));
}

#[tokio::test]
async fn test_service_duration_change_keeps_existing_appointment_length() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let response = app.book(&service_id, monday, "09:00", None).await;
    let id = parse_body(response).await["appointment"]["id"].as_str().unwrap().to_string();

    let response = app.request(
        "PUT",
        &format!("/api/v1/admin/services/{}", service_id),
        Some(json!({ "duration_minutes": 30 })),
        Some(&app.admin()),
    ).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request("GET", &format!("/api/v1/appointments/{}", id), None, Some(&app.admin())).await;
    assert_eq!(parse_body(response).await["duration_minutes"], 60);

    // 09:00 - 10:00 is still taken; 30 minute slots resume at 10:00
    assert_eq!(app.slots(&service_id, monday).await, vec!["10:00", "10:30", "11:00", "11:30"]);
}

#[tokio::test]
async fn test_service_catalog_visibility() {
    let app = TestApp::new().await;
    let active = app.create_service("Active", 30).await;
    let hidden = app.create_service("Hidden", 30).await;

    let response = app.request(
        "PUT",
        &format!("/api/v1/admin/services/{}", hidden),
        Some(json!({ "is_active": false })),
        Some(&app.admin()),
    ).await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = parse_body(app.request("GET", "/api/v1/services", None, None).await).await;
    let ids: Vec<_> = public.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap().to_string()).collect();
    assert_eq!(ids, vec![active.clone()]);

    let admin = parse_body(app.request("GET", "/api/v1/services", None, Some(&app.admin())).await).await;
    assert_eq!(admin.as_array().unwrap().len(), 2);

    let response = app.request("GET", &format!("/api/v1/services/{}", hidden), None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_service_definitions_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin();

    for payload in [
        json!({ "name": "Zero", "duration_minutes": 0 }),
        json!({ "name": "", "duration_minutes": 30 }),
        json!({ "name": "Negative price", "duration_minutes": 30, "price_cents": -100 }),
    ] {
        let response = app.request("POST", "/api/v1/admin/services", Some(payload), Some(&admin)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.request(
        "POST",
        "/api/v1/admin/services",
        Some(json!({ "name": "Sneaky", "duration_minutes": 30 })),
        Some(&app.client("client-1")),
    ).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
