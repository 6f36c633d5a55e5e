use axum::{extract::State, Json};
use school_core::error::AppError;

use crate::dtos::{LoginRequest, LoginResponse};
use crate::middleware::AuthUser;
use crate::models::user::normalize_email;
use crate::models::UserResponse;
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::{verify_password, Password, ValidatedJson};

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&payload.email);
    tracing::info!(email = %email, "Login attempt");

    let invalid = || AppError::Unauthorized(anyhow::anyhow!("Invalid credentials"));

    let user = state
        .store
        .users
        .find_one(Filter::all().eq("email", &email))
        .await?
        .ok_or_else(invalid)?;

    verify_password(&Password::new(payload.password), &user.password_hash).map_err(|_| {
        tracing::warn!(user_id = %user.id, "Password mismatch");
        invalid()
    })?;

    if !user.can_sign_in() {
        return Err(AppError::Forbidden(anyhow::anyhow!("Account inactive")));
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok(Json(LoginResponse {
        token,
        user: user.sanitized(),
    }))
}

/// Fresh profile for the token holder.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .users
        .get(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("User no longer exists")))?;
    Ok(Json(user.sanitized()))
}
