use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered player.
///
/// The `total_*` fields are a denormalized cache updated in the same
/// transaction as each tag commit. Ranking never reads them; the
/// leaderboard is always recomputed from the event log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub player_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_approved: bool,
    pub is_participating: bool,
    pub total_tags_given: i64,
    pub total_tags_received: i64,
    pub total_points: i64,
    pub total_time_held_seconds: i64,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}
