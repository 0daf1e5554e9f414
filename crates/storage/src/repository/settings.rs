use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::dto::settings::UpdateSettingsRequest;
use crate::error::Result;
use crate::models::GameSettings;

const SETTINGS_COLUMNS: &str = "settings_id, game_start, game_end, tag_points_rank_1, \
     tag_points_rank_2, tag_points_rank_3, tag_points_rank_4, tag_points_rank_5, \
     tag_points_rank_other, time_penalty_per_hour, bonus_untagged_day, \
     first_place_prize, last_place_prize, current_holder, holder_since, updated_at";

pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the singleton settings row, creating it with defaults on
    /// first access (window of 30 days starting now).
    pub async fn get_or_create(&self) -> Result<GameSettings> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO game_settings (settings_id, game_start, game_end) \
             VALUES (1, $1, $2) \
             ON CONFLICT (settings_id) DO NOTHING",
        )
        .bind(now)
        .bind(now + Duration::days(30))
        .execute(self.pool)
        .await?;

        let settings = sqlx::query_as::<_, GameSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM game_settings WHERE settings_id = 1"
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }

    /// Apply a partial update. This is the only settings write path.
    pub async fn update(&self, update: &UpdateSettingsRequest) -> Result<GameSettings> {
        let current = self.get_or_create().await?;

        let current_holder = update.current_holder.unwrap_or(current.current_holder);
        let holder_since = update.holder_since.unwrap_or(current.holder_since);

        let settings = sqlx::query_as::<_, GameSettings>(&format!(
            "UPDATE game_settings SET \
                game_start = $1, game_end = $2, \
                tag_points_rank_1 = $3, tag_points_rank_2 = $4, tag_points_rank_3 = $5, \
                tag_points_rank_4 = $6, tag_points_rank_5 = $7, tag_points_rank_other = $8, \
                time_penalty_per_hour = $9, bonus_untagged_day = $10, \
                first_place_prize = $11, last_place_prize = $12, \
                current_holder = $13, holder_since = $14, updated_at = now() \
             WHERE settings_id = 1 \
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(update.game_start.unwrap_or(current.game_start))
        .bind(update.game_end.unwrap_or(current.game_end))
        .bind(update.tag_points_rank_1.unwrap_or(current.tag_points_rank_1))
        .bind(update.tag_points_rank_2.unwrap_or(current.tag_points_rank_2))
        .bind(update.tag_points_rank_3.unwrap_or(current.tag_points_rank_3))
        .bind(update.tag_points_rank_4.unwrap_or(current.tag_points_rank_4))
        .bind(update.tag_points_rank_5.unwrap_or(current.tag_points_rank_5))
        .bind(
            update
                .tag_points_rank_other
                .unwrap_or(current.tag_points_rank_other),
        )
        .bind(
            update
                .time_penalty_per_hour
                .unwrap_or(current.time_penalty_per_hour),
        )
        .bind(update.bonus_untagged_day.unwrap_or(current.bonus_untagged_day))
        .bind(
            update
                .first_place_prize
                .clone()
                .unwrap_or(current.first_place_prize),
        )
        .bind(
            update
                .last_place_prize
                .clone()
                .unwrap_or(current.last_place_prize),
        )
        .bind(current_holder)
        .bind(holder_since)
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }
}
