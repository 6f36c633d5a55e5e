use axum::{extract::State, Json};
use school_core::error::AppError;

use crate::dtos::UpdateLandingConfigRequest;
use crate::middleware::AuthUser;
use crate::models::{LandingConfig, Role, LANDING_CONFIG_ID};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Stored config, creating the default on first read.
async fn load_or_init(state: &AppState) -> Result<LandingConfig, AppError> {
    if let Some(config) = state.store.landing.get(LANDING_CONFIG_ID).await? {
        return Ok(config);
    }
    let config = LandingConfig::default();
    state.store.landing.insert(&config).await?;
    tracing::info!("Initialized default landing config");
    Ok(config)
}

pub async fn get_landing(State(state): State<AppState>) -> Result<Json<LandingConfig>, AppError> {
    Ok(Json(load_or_init(&state).await?))
}

pub async fn update_landing(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateLandingConfigRequest>,
) -> Result<Json<LandingConfig>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut config = load_or_init(&state).await?;
    payload.apply(&mut config);
    state.store.landing.update(&config).await?;

    tracing::info!(updated_by = %auth.user_id, "Landing config updated");
    Ok(Json(config))
}
