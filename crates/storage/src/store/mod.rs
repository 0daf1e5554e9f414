pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Database;
use crate::dto::achievement::NewAchievement;
use crate::dto::tag::NewTag;
use crate::error::Result;
use crate::models::{GameSettings, Player, Tag};
use crate::repository::{
    AchievementRepository, PlayerRepository, SettingsRepository, TagRepository,
};

/// The narrow interface the game engine reads state through and commits
/// facts against. Production uses the Postgres-backed [`Database`];
/// [`memory::MemoryStore`] serves tests and local development.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Singleton settings, created lazily with defaults on first access.
    async fn settings(&self) -> Result<GameSettings>;

    async fn find_player(&self, id: Uuid) -> Result<Player>;

    /// Approved, participating players in stable identity order.
    async fn participants(&self) -> Result<Vec<Player>>;

    /// Verified tags in chronological order (ties by creation order).
    async fn verified_tags(&self) -> Result<Vec<Tag>>;

    async fn latest_verified(&self) -> Result<Option<Tag>>;

    async fn most_recent_verified_tagged(&self, tagged_id: Uuid) -> Result<Option<Tag>>;

    /// Append a priced tag and update both players' cached aggregates as
    /// one atomic commit.
    async fn commit_tag(&self, tag: NewTag) -> Result<Tag>;

    /// Discard the previous achievement set and install the new one
    /// atomically.
    async fn replace_achievements(&self, achievements: Vec<NewAchievement>) -> Result<()>;
}

#[async_trait]
impl GameStore for Database {
    async fn settings(&self) -> Result<GameSettings> {
        SettingsRepository::new(self.pool()).get_or_create().await
    }

    async fn find_player(&self, id: Uuid) -> Result<Player> {
        PlayerRepository::new(self.pool()).find_by_id(id).await
    }

    async fn participants(&self) -> Result<Vec<Player>> {
        PlayerRepository::new(self.pool()).list_participants().await
    }

    async fn verified_tags(&self) -> Result<Vec<Tag>> {
        TagRepository::new(self.pool()).list_verified().await
    }

    async fn latest_verified(&self) -> Result<Option<Tag>> {
        TagRepository::new(self.pool()).latest_verified().await
    }

    async fn most_recent_verified_tagged(&self, tagged_id: Uuid) -> Result<Option<Tag>> {
        TagRepository::new(self.pool())
            .most_recent_verified_tagged(tagged_id)
            .await
    }

    async fn commit_tag(&self, tag: NewTag) -> Result<Tag> {
        let mut tx = self.pool().begin().await?;

        let committed = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (tagger_id, tagged_id, tagged_at, location, notes, photo_url, \
                               points_awarded, time_penalty, time_held_seconds, verified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING tag_id, tagger_id, tagged_id, tagged_at, location, notes, photo_url, \
                       points_awarded, time_penalty, time_held_seconds, verified, created_at",
        )
        .bind(tag.tagger_id)
        .bind(tag.tagged_id)
        .bind(tag.tagged_at)
        .bind(&tag.location)
        .bind(&tag.notes)
        .bind(&tag.photo_url)
        .bind(tag.points_awarded)
        .bind(tag.time_penalty)
        .bind(tag.time_held_seconds)
        .bind(tag.verified)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE players SET total_tags_given = total_tags_given + 1, \
                                total_points = total_points + $2 \
             WHERE player_id = $1",
        )
        .bind(tag.tagger_id)
        .bind(i64::from(tag.points_awarded))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE players SET total_tags_received = total_tags_received + 1, \
                                total_points = total_points - $2, \
                                total_time_held_seconds = total_time_held_seconds + $3 \
             WHERE player_id = $1",
        )
        .bind(tag.tagged_id)
        .bind(i64::from(tag.time_penalty))
        .bind(tag.time_held_seconds)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(committed)
    }

    async fn replace_achievements(&self, achievements: Vec<NewAchievement>) -> Result<()> {
        AchievementRepository::new(self.pool())
            .replace_all(&achievements)
            .await
    }
}
