use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::achievement::NewAchievement;
use crate::dto::tag::NewTag;
use crate::error::{Result, StorageError};
use crate::models::{Achievement, GameSettings, Player, Tag};
use crate::store::GameStore;

/// In-process [`GameStore`] over `RwLock`-guarded vectors.
///
/// Each trait method takes the lock once, so multi-step commits
/// (`commit_tag`, `replace_achievements`) are atomic the same way the
/// Postgres transactions are.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    settings: Option<GameSettings>,
    players: Vec<Player>,
    tags: Vec<Tag>,
    achievements: Vec<Achievement>,
    now_for_defaults: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_default_time(Utc::now())
    }

    /// A store whose lazily-created settings window opens at `now`.
    pub fn with_default_time(now: DateTime<Utc>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                settings: None,
                players: Vec::new(),
                tags: Vec::new(),
                achievements: Vec::new(),
                now_for_defaults: now,
            }),
        }
    }

    pub async fn add_player(&self, username: &str, is_approved: bool, is_participating: bool) -> Player {
        let mut inner = self.inner.write().await;
        // Insertion order doubles as the stable identity order; spacing
        // created_at keeps it unambiguous.
        let created_at = inner.now_for_defaults + Duration::milliseconds(inner.players.len() as i64);
        let player = Player {
            player_id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_approved,
            is_participating,
            total_tags_given: 0,
            total_tags_received: 0,
            total_points: 0,
            total_time_held_seconds: 0,
            created_at,
        };
        inner.players.push(player.clone());
        player
    }

    pub async fn put_settings(&self, settings: GameSettings) {
        self.inner.write().await.settings = Some(settings);
    }

    pub async fn achievements(&self) -> Vec<Achievement> {
        self.inner.read().await.achievements.clone()
    }

    pub async fn all_tags(&self) -> Vec<Tag> {
        let mut tags = self.inner.read().await.tags.clone();
        sort_chronological(&mut tags);
        tags
    }

    /// Default settings mirroring the schema defaults: 30-day window from
    /// `start`, table 50/40/30/20/10/5, penalty 5/h, bonus 35.
    pub fn default_settings(start: DateTime<Utc>) -> GameSettings {
        GameSettings {
            settings_id: 1,
            game_start: start,
            game_end: start + Duration::days(30),
            tag_points_rank_1: 50,
            tag_points_rank_2: 40,
            tag_points_rank_3: 30,
            tag_points_rank_4: 20,
            tag_points_rank_5: 10,
            tag_points_rank_other: 5,
            time_penalty_per_hour: 5,
            bonus_untagged_day: 35,
            first_place_prize: "Grand prize".to_string(),
            last_place_prize: "Anti-prize".to_string(),
            current_holder: None,
            holder_since: None,
            updated_at: start,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_chronological(tags: &mut [Tag]) {
    tags.sort_by(|a, b| {
        a.tagged_at
            .cmp(&b.tagged_at)
            .then(a.created_at.cmp(&b.created_at))
    });
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn settings(&self) -> Result<GameSettings> {
        let mut inner = self.inner.write().await;
        let defaults_at = inner.now_for_defaults;
        let settings = inner
            .settings
            .get_or_insert_with(|| Self::default_settings(defaults_at));
        Ok(settings.clone())
    }

    async fn find_player(&self, id: Uuid) -> Result<Player> {
        self.inner
            .read()
            .await
            .players
            .iter()
            .find(|p| p.player_id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn participants(&self) -> Result<Vec<Player>> {
        Ok(self
            .inner
            .read()
            .await
            .players
            .iter()
            .filter(|p| p.is_approved && p.is_participating)
            .cloned()
            .collect())
    }

    async fn verified_tags(&self) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .inner
            .read()
            .await
            .tags
            .iter()
            .filter(|t| t.verified)
            .cloned()
            .collect();
        sort_chronological(&mut tags);
        Ok(tags)
    }

    async fn latest_verified(&self) -> Result<Option<Tag>> {
        Ok(self.verified_tags().await?.into_iter().next_back())
    }

    async fn most_recent_verified_tagged(&self, tagged_id: Uuid) -> Result<Option<Tag>> {
        Ok(self
            .verified_tags()
            .await?
            .into_iter()
            .filter(|t| t.tagged_id == tagged_id)
            .next_back())
    }

    async fn commit_tag(&self, tag: NewTag) -> Result<Tag> {
        let mut inner = self.inner.write().await;

        let committed = Tag {
            tag_id: Uuid::new_v4(),
            tagger_id: tag.tagger_id,
            tagged_id: tag.tagged_id,
            tagged_at: tag.tagged_at,
            location: tag.location,
            notes: tag.notes,
            photo_url: tag.photo_url,
            points_awarded: tag.points_awarded,
            time_penalty: tag.time_penalty,
            time_held_seconds: tag.time_held_seconds,
            verified: tag.verified,
            created_at: tag.tagged_at + Duration::nanoseconds(inner.tags.len() as i64),
        };

        if let Some(tagger) = inner
            .players
            .iter_mut()
            .find(|p| p.player_id == committed.tagger_id)
        {
            tagger.total_tags_given += 1;
            tagger.total_points += i64::from(committed.points_awarded);
        }
        if let Some(tagged) = inner
            .players
            .iter_mut()
            .find(|p| p.player_id == committed.tagged_id)
        {
            tagged.total_tags_received += 1;
            tagged.total_points -= i64::from(committed.time_penalty);
            tagged.total_time_held_seconds += committed.time_held_seconds;
        }

        inner.tags.push(committed.clone());

        Ok(committed)
    }

    async fn replace_achievements(&self, achievements: Vec<NewAchievement>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let awarded_at = inner.now_for_defaults;
        inner.achievements = achievements
            .into_iter()
            .map(|a| Achievement {
                achievement_id: Uuid::new_v4(),
                player_id: a.player_id,
                kind: a.kind,
                title: a.title,
                description: a.description,
                value: a.value,
                icon: a.icon,
                awarded_at,
            })
            .collect();
        Ok(())
    }
}
