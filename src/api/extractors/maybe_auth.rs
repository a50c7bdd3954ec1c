use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Actor;
use crate::error::AppError;
use crate::api::extractors::auth::{check_csrf, verify_token, ACCESS_TOKEN_COOKIE};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// The caller's identity if a valid access token is present, anonymous otherwise.
pub struct MaybeActor(pub Actor);

impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Cookies>().and_then(|c| c.get(ACCESS_TOKEN_COOKIE)) {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeActor(Actor::anonymous())),
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = match verify_token(&app_state, &token) {
            Ok(claims) => claims,
            Err(_) => {
                // Expired or foreign token: treat as guest
                debug!("MaybeActor: ignoring invalid access token");
                return Ok(MaybeActor(Actor::anonymous()));
            }
        };

        // A valid identity must not be usable cross-site
        check_csrf(parts, &claims)?;

        Span::current().record("user_id", claims.sub.as_str());
        Ok(MaybeActor(Actor::from_claims(&claims)))
    }
}
