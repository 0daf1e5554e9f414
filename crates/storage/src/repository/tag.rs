use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Tag;

const TAG_COLUMNS: &str = "tag_id, tagger_id, tagged_id, tagged_at, location, notes, \
     photo_url, points_awarded, time_penalty, time_held_seconds, verified, created_at";

pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All verified tags in chronological order, ties broken by creation
    /// order.
    pub async fn list_verified(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE verified \
             ORDER BY tagged_at, created_at"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn list_verified_for_player(&self, player_id: Uuid) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE verified AND (tagger_id = $1 OR tagged_id = $1) \
             ORDER BY tagged_at DESC, created_at DESC"
        ))
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn latest_verified(&self) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE verified \
             ORDER BY tagged_at DESC, created_at DESC LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    pub async fn most_recent_verified_tagged(&self, tagged_id: Uuid) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE verified AND tagged_id = $1 \
             ORDER BY tagged_at DESC, created_at DESC LIMIT 1"
        ))
        .bind(tagged_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE tag_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tag)
    }

    /// Administrative verification toggle. Unverified tags stop counting
    /// toward scoring but stay on record for disputes.
    pub async fn set_verified(&self, id: Uuid, verified: bool) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            "UPDATE tags SET verified = $2 WHERE tag_id = $1 RETURNING {TAG_COLUMNS}"
        ))
        .bind(id)
        .bind(verified)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tag)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
