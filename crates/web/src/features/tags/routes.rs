use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use super::handlers::{create_tag, delete_tag, list_tags, set_verified};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/", post(create_tag))
        .route("/:id/verify", patch(set_verified))
        .route("/:id", delete(delete_tag))
}
