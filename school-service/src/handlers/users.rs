use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use school_core::error::AppError;

use crate::dtos::{
    CreateTeacherRequest, CredentialedUser, UpdateCredentialsRequest, UpdateUserStatusRequest,
};
use crate::middleware::AuthUser;
use crate::models::user::normalize_email;
use crate::models::{Role, User, UserResponse};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::{generate_password, hash_password, Password, ValidatedJson};

pub async fn list_teachers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let teachers = state
        .store
        .users
        .find(Filter::all().eq("role", Role::Teacher))
        .await?;
    Ok(Json(teachers.into_iter().map(UserResponse::from).collect()))
}

/// Create a teacher with a generated password, returned once.
pub async fn create_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<CredentialedUser>), AppError> {
    auth.require(&[Role::Admin])?;

    let email = normalize_email(&payload.email);
    ensure_email_free(&state, &email, None).await?;

    let password = generate_password();
    let mut teacher = User::new(payload.name, &email, hash_password(&password)?, Role::Teacher);
    teacher.phone = payload.phone;
    teacher.address = payload.address;
    state.store.users.insert(&teacher).await?;

    tracing::info!(user_id = %teacher.id, "Teacher created");

    Ok((
        StatusCode::CREATED,
        Json(CredentialedUser {
            user: teacher.sanitized(),
            password: password.as_str().to_string(),
        }),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = find_user(&state, &id).await?;
    Ok(Json(user.sanitized()))
}

pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserStatusRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut user = find_user(&state, &id).await?;
    user.is_active = payload.is_active;
    state.store.users.update(&user).await?;

    tracing::info!(user_id = %user.id, is_active = user.is_active, "User status updated");
    Ok(Json(user.sanitized()))
}

/// Reset email and password. The new password is echoed back once.
pub async fn update_credentials(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCredentialsRequest>,
) -> Result<Json<CredentialedUser>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut user = find_user(&state, &id).await?;
    let email = normalize_email(&payload.email);
    ensure_email_free(&state, &email, Some(&user.id)).await?;

    let password = Password::new(payload.password);
    user.email = email;
    user.password_hash = hash_password(&password)?;
    state.store.users.update(&user).await?;

    tracing::info!(user_id = %user.id, "User credentials updated");
    Ok(Json(CredentialedUser {
        user: user.sanitized(),
        password: password.as_str().to_string(),
    }))
}

async fn find_user(state: &AppState, id: &str) -> Result<User, AppError> {
    state
        .store
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))
}

async fn ensure_email_free(
    state: &AppState,
    email: &str,
    owner: Option<&str>,
) -> Result<(), AppError> {
    let existing = state
        .store
        .users
        .find_one(Filter::all().eq("email", email))
        .await?;
    match existing {
        Some(user) if Some(user.id.as_str()) != owner => {
            Err(AppError::Conflict(anyhow::anyhow!("Email already in use")))
        }
        _ => Ok(()),
    }
}
