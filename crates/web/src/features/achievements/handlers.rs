use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::models::Achievement;
use storage::repository::AchievementRepository;

use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/achievements",
    responses(
        (status = 200, description = "Current achievement set", body = Vec<Achievement>)
    ),
    tag = "achievements"
)]
pub async fn list_achievements(State(state): State<AppState>) -> ApiResult<Response> {
    let achievements = AchievementRepository::new(state.db.pool()).list().await?;
    Ok(Json(achievements).into_response())
}

#[utoipa::path(
    post,
    path = "/api/achievements/recalculate",
    responses(
        (status = 204, description = "Achievement set replaced")
    ),
    tag = "achievements"
)]
pub async fn recalculate_achievements(State(state): State<AppState>) -> ApiResult<Response> {
    state.engine.recalculate_achievements().await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
