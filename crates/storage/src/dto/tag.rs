use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagRequest {
    pub tagger_id: Uuid,
    pub tagged_id: Uuid,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(max = 500))]
    pub photo_url: Option<String>,
}

/// Fully-priced tag record ready to append. Built only by the tag
/// processor; the store commits it together with both players' cached
/// aggregate updates.
#[derive(Debug, Clone)]
pub struct NewTag {
    pub tagger_id: Uuid,
    pub tagged_id: Uuid,
    pub tagged_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub points_awarded: i32,
    pub time_penalty: i32,
    pub time_held_seconds: i64,
    pub verified: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TagListFilter {
    /// Restrict to tags where this player is tagger or tagged.
    pub player: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetVerifiedRequest {
    pub verified: bool,
}
