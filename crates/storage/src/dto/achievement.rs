use uuid::Uuid;

use crate::models::AchievementKind;

/// Replacement achievement, not yet persisted. The deriver builds the full
/// set before the store swaps it in.
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub player_id: Uuid,
    pub kind: AchievementKind,
    pub title: String,
    pub description: String,
    pub value: String,
    pub icon: String,
}
