use axum::{
    extract::{Path, State},
    Json,
};
use school_core::error::AppError;

use crate::dtos::{MessageResponse, UpdateStudentRequest};
use crate::middleware::AuthUser;
use crate::models::{Role, Student};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Load a student the caller may see. Parents only see their own children.
pub(crate) async fn visible_student(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
) -> Result<Student, AppError> {
    let student = state
        .store
        .students
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    if auth.is(Role::Parent) && student.parent_id != auth.user_id {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Student belongs to another parent"
        )));
    }
    Ok(student)
}

pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Student>>, AppError> {
    let filter = match auth.role {
        Role::Parent => Filter::all().eq("parentId", &auth.user_id),
        Role::Admin | Role::Teacher => Filter::all(),
    };
    Ok(Json(state.store.students.find(filter).await?))
}

pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(visible_student(&state, &auth, &id).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut student = visible_student(&state, &auth, &id).await?;
    payload.apply(&mut student);
    state.store.students.update(&student).await?;

    tracing::info!(student_id = %student.id, "Student updated");
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require(&[Role::Admin])?;

    if !state.store.students.delete(&id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Student not found")));
    }
    tracing::info!(student_id = %id, "Student deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}

/// Whether a student id is taken; used when assigning ids to applications.
pub async fn check_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    Ok(Json(state.store.students.get(&id).await?.is_some()))
}
