use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Player;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerInfo {
    pub player_id: Uuid,
    pub username: String,
    pub full_name: String,
}

impl From<&Player> for PlayerInfo {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.player_id,
            username: player.username.clone(),
            full_name: player.full_name(),
        }
    }
}

/// One leaderboard row. Ephemeral: computed on demand from the verified
/// event log, never stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub player: PlayerInfo,
    pub points: i64,
    pub tags_given: i64,
    pub tags_received: i64,
    pub time_held_seconds: i64,
    pub is_current_holder: bool,
}
