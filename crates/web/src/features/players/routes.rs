use axum::{
    Router,
    routing::{get, patch, post},
};

use super::handlers::{create_player, get_player, list_players, set_approval, set_participation};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_players))
        .route("/", post(create_player))
        .route("/:id", get(get_player))
        .route("/:id/approval", patch(set_approval))
        .route("/:id/participation", patch(set_participation))
}
