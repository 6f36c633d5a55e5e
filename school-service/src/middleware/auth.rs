use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use school_core::error::AppError;

use crate::models::Role;
use crate::startup::AppState;

/// Authenticated caller, taken from the bearer token.
///
/// Use `Option<AuthUser>` on routes that are public but role-aware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    /// Forbidden unless the caller has one of `roles`.
    pub fn require(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(anyhow::anyhow!(
                "{} role may not perform this action",
                self.role
            )))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized(anyhow::anyhow!(
                        "Missing or invalid Authorization header"
                    ))
                })?;

        let claims = state.tokens.verify(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
        })?;

        let span = tracing::Span::current();
        span.record("user_id", claims.sub.as_str());
        span.record("role", claims.role.as_str());

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
