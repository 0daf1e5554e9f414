use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    WorstPlayer,
    FastestPlayer,
    SlowestPlayer,
    FastestCatch,
    SlowestCatch,
    MostTagsGiven,
    MostTagsReceived,
    Custom,
}

/// Derived, disposable record. The whole set is discarded and rebuilt on
/// every recalculation; nothing else treats it as a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Achievement {
    pub achievement_id: Uuid,
    pub player_id: Uuid,
    pub kind: AchievementKind,
    pub title: String,
    pub description: String,
    pub value: String,
    pub icon: String,
    pub awarded_at: DateTime<Utc>,
}
