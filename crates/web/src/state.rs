use std::sync::Arc;

use storage::Database;
use storage::services::GameEngine;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: Arc<GameEngine<Database>>,
}
