use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One tag event: `tagger` caught the holder (`tagged`).
///
/// Immutable once committed, except for the administrative `verified`
/// toggle and delete. Chronological order is `(tagged_at, created_at)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub tag_id: Uuid,
    pub tagger_id: Uuid,
    pub tagged_id: Uuid,
    pub tagged_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    /// Points credited to the tagger, priced at commit time.
    pub points_awarded: i32,
    /// Points debited from the tagged player for holding too long.
    pub time_penalty: i32,
    pub time_held_seconds: i64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
