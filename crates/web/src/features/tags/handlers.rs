use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::tag::{CreateTagRequest, SetVerifiedRequest, TagListFilter};
use storage::models::Tag;
use storage::repository::TagRepository;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tags",
    params(TagListFilter),
    responses(
        (status = 200, description = "Verified tag events", body = Vec<Tag>)
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Query(filter): Query<TagListFilter>,
) -> ApiResult<Response> {
    let repo = TagRepository::new(state.db.pool());

    let tags = match filter.player {
        Some(player_id) => repo.list_verified_for_player(player_id).await?,
        None => repo.list_verified().await?,
    };

    Ok(Json(tags).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag committed", body = Tag),
        (status = 400, description = "Game not active or invalid payload"),
        (status = 403, description = "Player not approved or not participating"),
        (status = 409, description = "Tagged player is not the current holder")
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<Response> {
    request.validate()?;

    let tag = state.engine.process_tag(request).await?;

    // Broadcast/push delivery belongs to the surrounding system; returning
    // the committed tag is all the engine owes its callers.
    Ok((StatusCode::CREATED, Json(tag)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/tags/{id}/verify",
    request_body = SetVerifiedRequest,
    responses(
        (status = 200, description = "Verification flag updated", body = Tag),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags"
)]
pub async fn set_verified(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetVerifiedRequest>,
) -> ApiResult<Response> {
    let tag = TagRepository::new(state.db.pool())
        .set_verified(id, request.verified)
        .await?;

    // Scoring inputs changed, so the derived set must follow.
    state.engine.recalculate_achievements().await?;

    Ok(Json(tag).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags"
)]
pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    TagRepository::new(state.db.pool()).delete(id).await?;

    state.engine.recalculate_achievements().await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
