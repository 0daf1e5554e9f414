use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_achievements, recalculate_achievements};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_achievements))
        .route("/recalculate", post(recalculate_achievements))
}
