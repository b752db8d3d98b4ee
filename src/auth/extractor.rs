use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::cookies::{REGION_COOKIE, ROLE_COOKIE, TOKEN_COOKIE};
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

/// The browser's session: the backend bearer token plus the role and region
/// cached at login. Only the token matters for access; the backend checks it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub region: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Halaman ini khusus administrator".to_string(),
            ))
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Silakan login terlebih dahulu".to_string()))?;

        let role = jar
            .get(ROLE_COOKIE)
            .map(|c| Role::parse(c.value()))
            .unwrap_or(Role::User);

        let region = jar
            .get(REGION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|r| !r.is_empty());

        Ok(Session {
            token,
            role,
            region,
        })
    }
}
