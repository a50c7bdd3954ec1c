use std::env;

use anyhow::{anyhow, Context};
use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub jwt_public_key: String, // Public key (PEM), tokens are issued elsewhere
    pub auth_issuer: String,
    pub auth_audience: String,
    pub provider_timezone: Tz,
    pub completion_sweep_secs: u64,
    pub max_booking_horizon_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let timezone_name = env::var("PROVIDER_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let provider_timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| anyhow!("PROVIDER_TIMEZONE is not a valid IANA timezone: {}", timezone_name))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            mail_service_url: env::var("MAIL_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            jwt_public_key: env::var("JWT_PUBLIC_KEY")
                .context("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)")?,
            auth_issuer: env::var("AUTH_ISSUER")
                .unwrap_or_else(|_| "https://auth.appointments.local".to_string()),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "booking-frontend".to_string()),
            provider_timezone,
            completion_sweep_secs: env::var("COMPLETION_SWEEP_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("COMPLETION_SWEEP_SECS must be a number")?,
            max_booking_horizon_days: env::var("MAX_BOOKING_HORIZON_DAYS")
                .unwrap_or_else(|_| "180".to_string())
                .parse()
                .context("MAX_BOOKING_HORIZON_DAYS must be a number")?,
        })
    }
}
