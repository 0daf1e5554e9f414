use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial settings update; absent fields keep their current value.
/// This is the single administrative write path for game configuration.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub game_start: Option<DateTime<Utc>>,
    pub game_end: Option<DateTime<Utc>>,
    pub tag_points_rank_1: Option<i32>,
    pub tag_points_rank_2: Option<i32>,
    pub tag_points_rank_3: Option<i32>,
    pub tag_points_rank_4: Option<i32>,
    pub tag_points_rank_5: Option<i32>,
    pub tag_points_rank_other: Option<i32>,
    pub time_penalty_per_hour: Option<i32>,
    pub bonus_untagged_day: Option<i32>,
    pub first_place_prize: Option<String>,
    pub last_place_prize: Option<String>,
    /// `Some(None)` clears the pin, `Some(Some(id))` pins a holder.
    #[serde(default, with = "double_option")]
    pub current_holder: Option<Option<Uuid>>,
    #[serde(default, with = "double_option")]
    pub holder_since: Option<Option<DateTime<Utc>>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoringRules {
    pub rank_1: i32,
    pub rank_2: i32,
    pub rank_3: i32,
    pub rank_4: i32,
    pub rank_5: i32,
    pub rank_6_plus: i32,
    pub time_penalty_per_hour: i32,
    pub untagged_day_bonus: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GamePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Prizes {
    pub first_place: String,
    pub last_place: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentHolderResponse {
    pub holder: Option<crate::dto::leaderboard::PlayerInfo>,
    pub holder_since: Option<DateTime<Utc>>,
}

/// Public rules summary exposed by the request layer.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameRules {
    pub rules: String,
    pub game_period: GamePeriod,
    pub scoring: ScoringRules,
    pub prizes: Prizes,
}

impl GameRules {
    pub fn from_settings(settings: &crate::models::GameSettings) -> Self {
        Self {
            rules: "Tag the player currently holding the token to earn points!".to_string(),
            game_period: GamePeriod {
                start: settings.game_start,
                end: settings.game_end,
            },
            scoring: ScoringRules {
                rank_1: settings.tag_points_rank_1,
                rank_2: settings.tag_points_rank_2,
                rank_3: settings.tag_points_rank_3,
                rank_4: settings.tag_points_rank_4,
                rank_5: settings.tag_points_rank_5,
                rank_6_plus: settings.tag_points_rank_other,
                time_penalty_per_hour: settings.time_penalty_per_hour,
                untagged_day_bonus: settings.bonus_untagged_day,
            },
            prizes: Prizes {
                first_place: settings.first_place_prize.clone(),
                last_place: settings.last_place_prize.clone(),
            },
        }
    }
}
