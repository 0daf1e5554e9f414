use sqlx::PgPool;

use crate::dto::achievement::NewAchievement;
use crate::error::Result;
use crate::models::Achievement;

const ACHIEVEMENT_COLUMNS: &str =
    "achievement_id, player_id, kind, title, description, value, icon, awarded_at";

pub struct AchievementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AchievementRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Achievement>> {
        let achievements = sqlx::query_as::<_, Achievement>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements ORDER BY awarded_at DESC, kind"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(achievements)
    }

    /// Swap the whole achievement set in one transaction. An error leaves
    /// the previous set untouched.
    pub async fn replace_all(&self, achievements: &[NewAchievement]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM achievements").execute(&mut *tx).await?;

        for achievement in achievements {
            sqlx::query(
                "INSERT INTO achievements (player_id, kind, title, description, value, icon) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(achievement.player_id)
            .bind(achievement.kind)
            .bind(&achievement.title)
            .bind(&achievement.description)
            .bind(&achievement.value)
            .bind(&achievement.icon)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
