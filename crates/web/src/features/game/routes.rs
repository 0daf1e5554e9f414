use axum::{
    Router,
    routing::{get, put},
};

use super::handlers::{get_current_settings, get_holder, get_rules, update_settings};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(get_current_settings))
        .route("/rules", get(get_rules))
        .route("/settings", put(update_settings))
        .route("/holder", get(get_holder))
}
