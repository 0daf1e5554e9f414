use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::player::{CreatePlayerRequest, SetApprovalRequest, SetParticipationRequest};
use storage::models::Player;
use storage::repository::PlayerRepository;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "All registered players", body = Vec<Player>)
    ),
    tag = "players"
)]
pub async fn list_players(State(state): State<AppState>) -> ApiResult<Response> {
    let players = PlayerRepository::new(state.db.pool()).list().await?;
    Ok(Json(players).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{id}",
    responses(
        (status = 200, description = "Player found", body = Player),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn get_player(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let player = PlayerRepository::new(state.db.pool()).find_by_id(id).await?;
    Ok(Json(player).into_response())
}

#[utoipa::path(
    post,
    path = "/api/players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player created", body = Player),
        (status = 409, description = "Username already taken")
    ),
    tag = "players"
)]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> ApiResult<Response> {
    request.validate()?;

    let player = PlayerRepository::new(state.db.pool()).create(&request).await?;

    Ok((StatusCode::CREATED, Json(player)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/players/{id}/approval",
    request_body = SetApprovalRequest,
    responses(
        (status = 200, description = "Approval flag updated", body = Player),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn set_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetApprovalRequest>,
) -> ApiResult<Response> {
    let player = PlayerRepository::new(state.db.pool())
        .set_approval(id, request.is_approved)
        .await?;

    Ok(Json(player).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/players/{id}/participation",
    request_body = SetParticipationRequest,
    responses(
        (status = 200, description = "Participation flag updated", body = Player),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn set_participation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetParticipationRequest>,
) -> ApiResult<Response> {
    let player = PlayerRepository::new(state.db.pool())
        .set_participation(id, request.is_participating)
        .await?;

    Ok(Json(player).into_response())
}
