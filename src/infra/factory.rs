use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::NotificationDispatcher;
use crate::domain::services::notification::EmailNotifier;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo,
    postgres_availability_repo::PostgresAvailabilityRepo,
    postgres_service_repo::PostgresServiceRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo,
    sqlite_service_repo::SqliteServiceRepo,
};

pub fn load_templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("confirmed.html", include_str!("../../templates/confirmed.html")),
        ("cancelled.html", include_str!("../../templates/cancelled.html")),
        ("deleted.html", include_str!("../../templates/deleted.html")),
    ]).context("Failed to load email templates")?;
    Ok(tera)
}

pub async fn bootstrap_state(config: &Config) -> anyhow::Result<AppState> {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ).context("Failed to build mail client")?);

    let templates = Arc::new(load_templates()?);
    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(EmailNotifier::new(
        email_service,
        templates,
        config.provider_timezone,
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().context("Invalid Postgres URL")?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .context("Failed to connect to Postgres")?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            Arc::new(PostgresServiceRepo::new(pool.clone())),
            Arc::new(PostgresAppointmentRepo::new(pool)),
            notifier,
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .context("Invalid SQLite connection string")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .context("Failed to connect to SQLite")?;

        run_sqlite_migrations(&pool).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            Arc::new(SqliteServiceRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool)),
            notifier,
        ))
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .context("Failed to run Postgres migrations")
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .context("Failed to run SQLite migrations")
}
