use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use school_core::error::AppError;

use crate::dtos::{check_non_negative, CreateBatchRequest, UpdateBatchRequest};
use crate::middleware::AuthUser;
use crate::models::{default_capacity, new_id, Batch, Role};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_batches(State(state): State<AppState>) -> Result<Json<Vec<Batch>>, AppError> {
    Ok(Json(state.store.batches.find(Filter::all()).await?))
}

pub async fn create_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateBatchRequest>,
) -> Result<(StatusCode, Json<Batch>), AppError> {
    auth.require(&[Role::Admin])?;
    check_non_negative("feeAmount", payload.fee_amount)?;
    ensure_name_free(&state, &payload.name, None).await?;

    let batch = Batch {
        id: new_id(),
        name: payload.name,
        capacity: payload.capacity.unwrap_or_else(default_capacity),
        fee_amount: payload.fee_amount.unwrap_or_default(),
        description: payload.description,
        age_group: payload.age_group,
    };
    state.store.batches.insert(&batch).await?;

    tracing::info!(batch_id = %batch.id, name = %batch.name, "Batch created");
    Ok((StatusCode::CREATED, Json(batch)))
}

pub async fn update_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBatchRequest>,
) -> Result<Json<Batch>, AppError> {
    auth.require(&[Role::Admin])?;
    check_non_negative("feeAmount", payload.fee_amount)?;

    let mut batch = state
        .store
        .batches
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Batch not found")))?;
    if let Some(name) = &payload.name {
        ensure_name_free(&state, name, Some(&batch.id)).await?;
    }

    payload.apply(&mut batch);
    state.store.batches.update(&batch).await?;

    tracing::info!(batch_id = %batch.id, fee_amount = %batch.fee_amount, "Batch updated");
    Ok(Json(batch))
}

/// Students reference batches by name, so names stay unique.
async fn ensure_name_free(state: &AppState, name: &str, except: Option<&str>) -> Result<(), AppError> {
    let taken = state
        .store
        .batches
        .find_one(Filter::all().eq("name", name))
        .await?
        .is_some_and(|b| Some(b.id.as_str()) != except);
    if taken {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Batch {} already exists",
            name
        )));
    }
    Ok(())
}
