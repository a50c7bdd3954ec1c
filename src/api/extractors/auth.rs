use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::{Actor, Claims};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{error, Span};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Verifies an access token against the configured public key, issuer and audience.
pub fn verify_token(app_state: &AppState, token: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
        .map_err(|e| {
            error!("Invalid JWT public key configuration: {:?}", e);
            AppError::Internal
        })?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[app_state.config.auth_audience.as_str()]);
    validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Non-safe methods must echo the token's CSRF claim in a header.
pub fn check_csrf(parts: &Parts, claims: &Claims) -> Result<(), AppError> {
    let method = &parts.method;
    if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        return Ok(());
    }

    let header = parts.headers.get(CSRF_HEADER)
        .ok_or(AppError::Forbidden("Missing CSRF token".into()))?
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid CSRF token".into()))?;

    if header != claims.csrf_token {
        return Err(AppError::Forbidden("Invalid CSRF token".into()));
    }
    Ok(())
}

fn access_token(parts: &Parts) -> Option<String> {
    parts.extensions.get::<Cookies>()?
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
}

/// An authenticated caller, client or admin.
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = access_token(parts).ok_or(AppError::Unauthorized)?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = verify_token(&app_state, &token)?;
        check_csrf(parts, &claims)?;

        Span::current().record("user_id", claims.sub.as_str());

        Ok(AuthUser(Actor::from_claims(&claims)))
    }
}

/// An authenticated caller holding the admin role.
pub struct AdminUser(pub Actor);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;
        if !actor.is_admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser(actor))
    }
}
