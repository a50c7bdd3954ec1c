use appointment_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_service_repo::SqliteServiceRepo,
    },
    domain::models::{
        auth::{Claims, ROLE_ADMIN},
        notification::{AppointmentSummary, NotificationKind},
    },
    domain::ports::NotificationDispatcher,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header, StatusCode},
    response::Response,
    Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use std::str::FromStr;
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header, Algorithm};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_ISSUER: &str = "test-issuer";
pub const TEST_AUDIENCE: &str = "booking-frontend";

#[derive(Debug, Clone)]
pub struct SentNotification {
    pub recipient: String,
    pub kind: NotificationKind,
    pub appointment_id: String,
}

/// Records every notification; optionally fails each delivery after recording it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentNotification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.sent.lock().unwrap().iter().filter(|n| n.kind == kind).count()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify(&self, recipient: &str, kind: NotificationKind, summary: &AppointmentSummary) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentNotification {
            recipient: recipient.to_string(),
            kind,
            appointment_id: summary.appointment_id.clone(),
        });
        if self.fail {
            return Err(AppError::InternalWithMsg("mail relay down".into()));
        }
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifier: Arc<RecordingNotifier>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::build(RecordingNotifier::default()).await
    }

    pub async fn with_failing_notifier() -> Self {
        Self::build(RecordingNotifier { fail: true, ..Default::default() }).await
    }

    async fn build(notifier: RecordingNotifier) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: TEST_ISSUER.to_string(),
            auth_audience: TEST_AUDIENCE.to_string(),
            provider_timezone: chrono_tz::UTC,
            completion_sweep_secs: 0,
            max_booking_horizon_days: 180,
        };

        let notifier = Arc::new(notifier);

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            Arc::new(SqliteServiceRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            notifier.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifier,
        }
    }

    /// Signs an access token the way the identity provider would.
    pub fn mint_token(&self, subject: &str, role: &str) -> AuthHeaders {
        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let now = Utc::now().timestamp() as usize;
        let csrf_token = Uuid::new_v4().to_string();

        let claims = Claims {
            iss: TEST_ISSUER.to_string(),
            sub: subject.to_string(),
            aud: TEST_AUDIENCE.to_string(),
            exp: now + 3600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
            role: role.to_string(),
            csrf_token: csrf_token.clone(),
        };

        let key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes()).unwrap();
        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &key).unwrap();

        AuthHeaders { access_token, csrf_token }
    }

    pub fn admin(&self) -> AuthHeaders {
        self.mint_token("provider-1", ROLE_ADMIN)
    }

    pub fn client(&self, id: &str) -> AuthHeaders {
        self.mint_token(id, "CLIENT")
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, auth: Option<&AuthHeaders>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Creates a service as admin and returns its id.
    pub async fn create_service(&self, name: &str, duration_minutes: i32) -> String {
        let response = self.request(
            "POST",
            "/api/v1/admin/services",
            Some(json!({ "name": name, "duration_minutes": duration_minutes, "price_cents": 5000 })),
            Some(&self.admin()),
        ).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn set_window(&self, weekday: i32, start: &str, end: &str) {
        let response = self.request(
            "PUT",
            &format!("/api/v1/admin/availability/{}", weekday),
            Some(json!({ "is_available": true, "start_time": start, "end_time": end })),
            Some(&self.admin()),
        ).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub async fn slots(&self, service_id: &str, date: NaiveDate) -> Vec<String> {
        let response = self.request(
            "GET",
            &format!("/api/v1/services/{}/slots?date={}", service_id, date),
            None,
            None,
        ).await;
        assert_eq!(response.status(), StatusCode::OK);
        parse_body(response).await["slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap().to_string())
            .collect()
    }

    pub async fn book(&self, service_id: &str, date: NaiveDate, time: &str, auth: Option<&AuthHeaders>) -> Response {
        self.request(
            "POST",
            "/api/v1/appointments",
            Some(json!({
                "service_id": service_id,
                "date": date.to_string(),
                "time": time,
                "contact_name": "Alice Example",
                "contact_email": "alice@example.com",
                "contact_phone": "+49 30 1234567",
            })),
            auth,
        ).await
    }

    pub async fn transition(&self, id: &str, event: &str, auth: &AuthHeaders) -> Response {
        self.request(
            "POST",
            &format!("/api/v1/appointments/{}/transition", id),
            Some(json!({ "event": event })),
            Some(auth),
        ).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The next date (strictly after today, UTC) falling on `weekday` (0 = Sunday).
#[allow(dead_code)]
pub fn next_weekday(weekday: u32) -> NaiveDate {
    let mut date = Utc::now().date_naive() + chrono::Duration::days(1);
    while date.weekday().num_days_from_sunday() != weekday {
        date += chrono::Duration::days(1);
    }
    date
}
