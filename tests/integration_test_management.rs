mod common;

use appointment_backend::domain::models::notification::NotificationKind;
use axum::http::StatusCode;
use common::{next_weekday, parse_body, TestApp};

#[tokio::test]
async fn test_token_holder_can_view_and_cancel() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let body = parse_body(app.book(&service_id, monday, "10:00", None).await).await;
    let id = body["appointment"]["id"].as_str().unwrap().to_string();
    let token = body["management_token"].as_str().unwrap().to_string();

    let response = app.request("GET", &format!("/api/v1/appointments/manage/{}", token), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = parse_body(response).await;
    assert_eq!(view["appointment"]["id"], id.as_str());
    assert_eq!(view["service"]["name"], "Consultation");

    let response = app.request("POST", &format!("/api/v1/appointments/manage/{}/cancel", token), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "cancelled");
    assert_eq!(app.notifier.count(NotificationKind::Cancelled), 1);

    // Cancelling twice through the link is harmless
    let response = app.request("POST", &format!("/api/v1/appointments/manage/{}/cancel", token), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.notifier.count(NotificationKind::Cancelled), 1);

    assert_eq!(app.slots(&service_id, monday).await, vec!["09:00", "10:00", "11:00"]);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/v1/appointments/manage/not-a-token", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.request("POST", "/api/v1/appointments/manage/not-a-token/cancel", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clients_list_only_their_own_appointments() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    let monday = next_weekday(1);

    let alice = app.client("alice");
    let bob = app.client("bob");
    assert_eq!(app.book(&service_id, monday, "09:00", Some(&alice)).await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&service_id, monday, "10:00", Some(&bob)).await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&service_id, monday, "11:00", None).await.status(), StatusCode::CREATED);

    let mine = parse_body(app.request("GET", "/api/v1/appointments", None, Some(&alice)).await).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["client_id"], "alice");

    let all = parse_body(app.request("GET", "/api/v1/appointments", None, Some(&app.admin())).await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let response = app.request("GET", "/api/v1/appointments", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_listing_filters() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Consultation", 60).await;
    app.set_window(1, "09:00", "12:00").await;
    app.set_window(3, "09:00", "12:00").await;
    let monday = next_weekday(1);
    let wednesday = next_weekday(3);
    let admin = app.admin();

    let first = parse_body(app.book(&service_id, monday, "09:00", None).await).await;
    let first_id = first["appointment"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.book(&service_id, wednesday, "09:00", None).await.status(), StatusCode::CREATED);
    assert_eq!(app.transition(&first_id, "confirm", &admin).await.status(), StatusCode::OK);

    let confirmed = parse_body(app.request("GET", "/api/v1/appointments?status=confirmed", None, Some(&admin)).await).await;
    let confirmed = confirmed.as_array().unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["id"], first_id.as_str());

    let from = monday.and_hms_opt(0, 0, 0).unwrap().and_utc().format("%Y-%m-%dT%H:%M:%SZ");
    let to = monday.and_hms_opt(23, 59, 0).unwrap().and_utc().format("%Y-%m-%dT%H:%M:%SZ");
    let response = app.request("GET", &format!("/api/v1/appointments?from={}&to={}", from, to), None, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let on_monday = parse_body(response).await;
    let on_monday = on_monday.as_array().unwrap();
    assert_eq!(on_monday.len(), 1);
    assert_eq!(on_monday[0]["id"], first_id.as_str());
}
