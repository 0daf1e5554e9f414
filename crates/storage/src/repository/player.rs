use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::player::CreatePlayerRequest;
use crate::error::{Result, StorageError};
use crate::models::Player;

const PLAYER_COLUMNS: &str = "player_id, username, first_name, last_name, is_approved, \
     is_participating, total_tags_given, total_tags_received, total_points, \
     total_time_held_seconds, created_at";

pub struct PlayerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY created_at, player_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(players)
    }

    /// Approved, participating players in stable identity order. This
    /// order is what breaks leaderboard ties, so it must be deterministic.
    pub async fn list_participants(&self) -> Result<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players \
             WHERE is_approved AND is_participating \
             ORDER BY created_at, player_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(players)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Player> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE player_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(player)
    }

    pub async fn create(&self, request: &CreatePlayerRequest) -> Result<Player> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "INSERT INTO players (username, first_name, last_name) \
             VALUES ($1, $2, $3) \
             RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(&request.username)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                StorageError::ConstraintViolation(format!(
                    "username '{}' is already taken",
                    request.username
                ))
            } else {
                e
            }
        })?;

        Ok(player)
    }

    pub async fn set_approval(&self, id: Uuid, is_approved: bool) -> Result<Player> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "UPDATE players SET is_approved = $2 WHERE player_id = $1 \
             RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(id)
        .bind(is_approved)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(player)
    }

    pub async fn set_participation(&self, id: Uuid, is_participating: bool) -> Result<Player> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "UPDATE players SET is_participating = $2 WHERE player_id = $1 \
             RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(id)
        .bind(is_participating)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(player)
    }
}
