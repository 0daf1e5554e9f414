use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Game configuration. One row, forced primary key 1, created lazily with
/// defaults on first access and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GameSettings {
    pub settings_id: i32,
    pub game_start: DateTime<Utc>,
    pub game_end: DateTime<Utc>,
    pub tag_points_rank_1: i32,
    pub tag_points_rank_2: i32,
    pub tag_points_rank_3: i32,
    pub tag_points_rank_4: i32,
    pub tag_points_rank_5: i32,
    pub tag_points_rank_other: i32,
    pub time_penalty_per_hour: i32,
    pub bonus_untagged_day: i32,
    pub first_place_prize: String,
    pub last_place_prize: String,
    /// Admin-pinned holder; overrides derivation from the event log.
    pub current_holder: Option<Uuid>,
    pub holder_since: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl GameSettings {
    /// Active window is `[game_start, game_end)`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.game_start <= now && now < self.game_end
    }

    /// Scoring table: index 0..4 price ranks 1..5, index 5 prices rank 6+.
    pub fn tag_points_list(&self) -> [i32; 6] {
        [
            self.tag_points_rank_1,
            self.tag_points_rank_2,
            self.tag_points_rank_3,
            self.tag_points_rank_4,
            self.tag_points_rank_5,
            self.tag_points_rank_other,
        ]
    }
}
