use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::leaderboard::LeaderboardEntry;

use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    responses(
        (status = 200, description = "Current standings, recomputed from the event log", body = Vec<LeaderboardEntry>)
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Response> {
    let leaderboard = state.engine.calculate_leaderboard().await?;
    Ok(Json(leaderboard).into_response())
}
