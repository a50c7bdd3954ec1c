use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ADMIN";

/// Access token claims. Tokens are minted by the identity provider; this
/// service only verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://appointments.local/claims/role")]
    pub role: String,

    #[serde(rename = "https://appointments.local/claims/csrf")]
    pub csrf_token: String,
}

/// The resolved identity of whoever issued a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub client_id: Option<String>,
    pub is_admin: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self { client_id: None, is_admin: false }
    }

    pub fn client(client_id: impl Into<String>) -> Self {
        Self { client_id: Some(client_id.into()), is_admin: false }
    }

    pub fn admin(admin_id: impl Into<String>) -> Self {
        Self { client_id: Some(admin_id.into()), is_admin: true }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            client_id: Some(claims.sub.clone()),
            is_admin: claims.role == ROLE_ADMIN,
        }
    }

    /// Admins own everything; clients own records carrying their id.
    pub fn owns(&self, owner: Option<&str>) -> bool {
        if self.is_admin {
            return true;
        }
        match (self.client_id.as_deref(), owner) {
            (Some(me), Some(owner)) => me == owner,
            _ => false,
        }
    }
}
