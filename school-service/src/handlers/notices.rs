use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use school_core::error::AppError;

use crate::dtos::CreateNoticeRequest;
use crate::middleware::AuthUser;
use crate::models::{new_id, Notice, Role};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Notices visible to the caller, newest first. Anonymous callers get
/// public notices only.
pub async fn list_notices(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> Result<Json<Vec<Notice>>, AppError> {
    let role = auth.map(|a| a.role);
    let mut notices: Vec<Notice> = state
        .store
        .notices
        .find(Filter::all())
        .await?
        .into_iter()
        .filter(|n| n.visible_to(role))
        .collect();
    notices.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(notices))
}

pub async fn create_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<Notice>), AppError> {
    auth.require(&[Role::Admin, Role::Teacher])?;

    let notice = Notice {
        id: new_id(),
        title: payload.title,
        content: payload.content,
        date: state.clock.today(),
        visibility: payload.visibility,
        priority: payload.priority,
        category: payload.category,
        read_by: Vec::new(),
    };
    state.store.notices.insert(&notice).await?;

    tracing::info!(notice_id = %notice.id, visibility = ?notice.visibility, "Notice published");
    Ok((StatusCode::CREATED, Json(notice)))
}

/// Records that the caller has read the notice.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Notice>, AppError> {
    let mut notice = state
        .store
        .notices
        .get(&id)
        .await?
        .filter(|n| n.visible_to(Some(auth.role)))
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Notice not found")))?;

    if notice.mark_read(&auth.user_id) {
        state.store.notices.update(&notice).await?;
    }
    Ok(Json(notice))
}
