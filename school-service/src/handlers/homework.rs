use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use school_core::error::AppError;

use crate::dtos::{CreateHomeworkRequest, HomeworkQuery, SubmitHomeworkRequest};
use crate::middleware::AuthUser;
use crate::models::{new_id, Homework, Role};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_homework(
    State(state): State<AppState>,
    Query(query): Query<HomeworkQuery>,
) -> Result<Json<Vec<Homework>>, AppError> {
    let filter = match &query.batch {
        Some(batch) => Filter::all().eq("batch", batch),
        None => Filter::all(),
    };
    let mut homework = state.store.homework.find(filter).await?;
    homework.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    Ok(Json(homework))
}

pub async fn create_homework(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateHomeworkRequest>,
) -> Result<(StatusCode, Json<Homework>), AppError> {
    auth.require(&[Role::Admin, Role::Teacher])?;

    let homework = Homework {
        id: new_id(),
        title: payload.title,
        description: payload.description,
        due_date: payload.due_date,
        batch: payload.batch,
        submitted_by: Vec::new(),
    };
    state.store.homework.insert(&homework).await?;

    tracing::info!(homework_id = %homework.id, batch = %homework.batch, "Homework assigned");
    Ok((StatusCode::CREATED, Json(homework)))
}

/// Records a student's submission. Submitting twice is a no-op.
pub async fn submit_homework(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<SubmitHomeworkRequest>,
) -> Result<Json<Homework>, AppError> {
    auth.require(&[Role::Admin, Role::Teacher])?;

    let mut homework = state
        .store
        .homework
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Homework not found")))?;
    if state.store.students.get(&payload.student_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Student not found")));
    }

    if !homework.submitted_by.contains(&payload.student_id) {
        homework.submitted_by.push(payload.student_id);
        state.store.homework.update(&homework).await?;
    }
    Ok(Json(homework))
}
