use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::leaderboard::LeaderboardEntry;
use crate::dto::tag::{CreateTagRequest, NewTag};
use crate::error::{GameError, GameResult, StorageError};
use crate::models::Tag;
use crate::services::achievements::derive_achievements;
use crate::services::clock::Clock;
use crate::services::leaderboard::compute_leaderboard;
use crate::store::GameStore;

/// The scoring engine: holder resolution, leaderboard derivation, the
/// single tag write path, and achievement recalculation.
///
/// `process_tag` runs its whole read-decide-commit sequence under the
/// write half of `game_lock`, so two simultaneous attempts against the
/// same holder serialize and the loser fails with `WrongHolder` after
/// observing the winner's commit. Read paths share the read half and
/// never observe a half-committed event (store commits are themselves
/// transactional).
pub struct GameEngine<S: GameStore> {
    store: S,
    clock: Arc<dyn Clock>,
    game_lock: RwLock<()>,
}

impl<S: GameStore> GameEngine<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            game_lock: RwLock::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Who currently holds the token: the admin-pinned holder if set,
    /// else the tagged player of the most recent verified tag, else none.
    pub async fn resolve_holder(&self) -> GameResult<Option<Uuid>> {
        let _guard = self.game_lock.read().await;
        self.resolve_holder_locked().await
    }

    async fn resolve_holder_locked(&self) -> GameResult<Option<Uuid>> {
        let settings = self.store.settings().await?;
        if let Some(holder) = settings.current_holder {
            return Ok(Some(holder));
        }
        Ok(self
            .store
            .latest_verified()
            .await?
            .map(|tag| tag.tagged_id))
    }

    pub async fn calculate_leaderboard(&self) -> GameResult<Vec<LeaderboardEntry>> {
        let _guard = self.game_lock.read().await;
        self.calculate_leaderboard_locked().await
    }

    async fn calculate_leaderboard_locked(&self) -> GameResult<Vec<LeaderboardEntry>> {
        let now = self.clock.now();
        let settings = self.store.settings().await?;
        let participants = self.store.participants().await?;
        let tags = self.store.verified_tags().await?;
        let holder = settings
            .current_holder
            .or_else(|| tags.last().map(|tag| tag.tagged_id));

        Ok(compute_leaderboard(
            &settings,
            &participants,
            &tags,
            holder,
            now,
        ))
    }

    /// Validate and commit one tag event.
    ///
    /// Preconditions, each with its own failure: game active, both players
    /// approved, both participating, and the tagged player is the current
    /// holder (or there is no holder yet). On success the committed tag is
    /// returned and achievements are recalculated synchronously.
    pub async fn process_tag(&self, request: CreateTagRequest) -> GameResult<Tag> {
        let _guard = self.game_lock.write().await;

        let now = self.clock.now();
        let settings = self.store.settings().await?;

        if !settings.is_active(now) {
            return Err(GameError::GameNotActive);
        }

        let tagger = self.store.find_player(request.tagger_id).await?;
        let tagged = self.store.find_player(request.tagged_id).await?;

        if !tagger.is_approved || !tagged.is_approved {
            return Err(GameError::NotApproved);
        }
        if !tagger.is_participating {
            return Err(GameError::NotParticipating {
                username: tagger.username,
            });
        }
        if !tagged.is_participating {
            return Err(GameError::NotParticipating {
                username: tagged.username,
            });
        }

        let participants = self.store.participants().await?;
        let tags = self.store.verified_tags().await?;
        let holder = settings
            .current_holder
            .or_else(|| tags.last().map(|tag| tag.tagged_id));

        if let Some(holder_id) = holder {
            if holder_id != tagged.player_id {
                let holder_name = match self.store.find_player(holder_id).await {
                    Ok(player) => player.username,
                    Err(StorageError::NotFound) => holder_id.to_string(),
                    Err(e) => return Err(e.into()),
                };
                return Err(GameError::WrongHolder {
                    tagged: tagged.username,
                    holder: holder_name,
                });
            }
        }

        // Time held since the tagged player's previous verified capture;
        // zero for a first-time holder.
        let time_held = self
            .store
            .most_recent_verified_tagged(tagged.player_id)
            .await?
            .map(|tag| now - tag.tagged_at)
            .unwrap_or_else(Duration::zero);

        // Only full hours are penalized.
        let time_penalty = (time_held.num_hours().max(0) as i32) * settings.time_penalty_per_hour;

        // Price against the leaderboard as it stands before this event.
        let leaderboard = compute_leaderboard(&settings, &participants, &tags, holder, now);
        let rank = leaderboard
            .iter()
            .find(|entry| entry.player.player_id == tagged.player_id)
            .map(|entry| entry.rank as usize)
            .unwrap_or(leaderboard.len());

        let points_awarded = points_for_rank(rank, &settings.tag_points_list());

        let committed = self
            .store
            .commit_tag(NewTag {
                tagger_id: tagger.player_id,
                tagged_id: tagged.player_id,
                tagged_at: now,
                location: request.location,
                notes: request.notes,
                photo_url: request.photo_url,
                points_awarded,
                time_penalty,
                time_held_seconds: time_held.num_seconds().max(0),
                verified: true,
            })
            .await?;

        tracing::info!(
            tagger = %tagger.username,
            tagged = %tagged.username,
            points = points_awarded,
            penalty = time_penalty,
            "tag committed"
        );

        self.recalculate_achievements_locked().await?;

        Ok(committed)
    }

    /// Wholesale achievement replacement from the current leaderboard and
    /// event history.
    pub async fn recalculate_achievements(&self) -> GameResult<()> {
        let _guard = self.game_lock.read().await;
        self.recalculate_achievements_locked().await
    }

    async fn recalculate_achievements_locked(&self) -> GameResult<()> {
        let leaderboard = self.calculate_leaderboard_locked().await?;
        let tags = self.store.verified_tags().await?;

        let achievements = derive_achievements(&leaderboard, &tags);
        let count = achievements.len();
        self.store.replace_achievements(achievements).await?;

        tracing::debug!(count, "achievements recalculated");

        Ok(())
    }
}

/// Rank 1 earns the top tier, ranks past the table clamp to the bottom
/// tier. Rank 0 (an empty leaderboard) also prices at the bottom tier.
fn points_for_rank(rank: usize, table: &[i32; 6]) -> i32 {
    if rank == 0 {
        return table[table.len() - 1];
    }
    table[(rank - 1).min(table.len() - 1)]
}
