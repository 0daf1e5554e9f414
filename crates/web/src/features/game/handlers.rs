use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::leaderboard::PlayerInfo;
use storage::dto::settings::{CurrentHolderResponse, GameRules, UpdateSettingsRequest};
use storage::error::StorageError;
use storage::models::GameSettings;
use storage::repository::{PlayerRepository, SettingsRepository};

use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/game/current",
    responses(
        (status = 200, description = "Current game settings", body = GameSettings)
    ),
    tag = "game"
)]
pub async fn get_current_settings(State(state): State<AppState>) -> ApiResult<Response> {
    let settings = SettingsRepository::new(state.db.pool()).get_or_create().await?;
    Ok(Json(settings).into_response())
}

#[utoipa::path(
    get,
    path = "/api/game/rules",
    responses(
        (status = 200, description = "Public scoring rules and prizes", body = GameRules)
    ),
    tag = "game"
)]
pub async fn get_rules(State(state): State<AppState>) -> ApiResult<Response> {
    let settings = SettingsRepository::new(state.db.pool()).get_or_create().await?;
    Ok(Json(GameRules::from_settings(&settings)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/game/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = GameSettings)
    ),
    tag = "game"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> ApiResult<Response> {
    let settings = SettingsRepository::new(state.db.pool()).update(&request).await?;
    tracing::info!("game settings updated");
    Ok(Json(settings).into_response())
}

#[utoipa::path(
    get,
    path = "/api/game/holder",
    responses(
        (status = 200, description = "Current token holder, if any", body = CurrentHolderResponse)
    ),
    tag = "game"
)]
pub async fn get_holder(State(state): State<AppState>) -> ApiResult<Response> {
    let holder_id = state.engine.resolve_holder().await?;

    let holder = match holder_id {
        Some(id) => match PlayerRepository::new(state.db.pool()).find_by_id(id).await {
            Ok(player) => Some(PlayerInfo::from(&player)),
            Err(StorageError::NotFound) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let settings = SettingsRepository::new(state.db.pool()).get_or_create().await?;

    Ok(Json(CurrentHolderResponse {
        holder,
        holder_since: settings.holder_since,
    })
    .into_response())
}
