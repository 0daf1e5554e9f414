use std::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::dto::leaderboard::{LeaderboardEntry, PlayerInfo};
use crate::models::{GameSettings, Player, Tag};

/// Derive the full leaderboard from the verified event log.
///
/// Deterministic in its inputs: `tags` must be the chronological verified
/// history and `players` the participants in stable identity order.
/// Ties on points keep that input order (stable sort), so repeated calls
/// with no intervening writes are bit-identical.
pub fn compute_leaderboard(
    settings: &GameSettings,
    players: &[Player],
    tags: &[Tag],
    current_holder: Option<Uuid>,
    now: DateTime<Utc>,
) -> Vec<LeaderboardEntry> {
    let all_tag_dates: BTreeSet<NaiveDate> = tags.iter().map(|t| t.tagged_at.date_naive()).collect();

    let mut entries: Vec<LeaderboardEntry> = players
        .iter()
        .map(|player| {
            let given: Vec<&Tag> = tags.iter().filter(|t| t.tagger_id == player.player_id).collect();
            let received: Vec<&Tag> = tags.iter().filter(|t| t.tagged_id == player.player_id).collect();

            let mut points: i64 = given.iter().map(|t| i64::from(t.points_awarded)).sum();
            points -= received.iter().map(|t| i64::from(t.time_penalty)).sum::<i64>();
            points += untagged_day_bonus(&all_tag_dates, &received, settings.bonus_untagged_day);

            let is_current_holder = current_holder == Some(player.player_id);
            let time_held = total_time_held(&received, is_current_holder, now);

            LeaderboardEntry {
                rank: 0,
                player: PlayerInfo::from(player),
                points,
                tags_given: given.len() as i64,
                tags_received: received.len() as i64,
                time_held_seconds: time_held.num_seconds(),
                is_current_holder,
            }
        })
        .collect();

    entries.sort_by_key(|e| Reverse(e.points));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as i64 + 1;
    }

    entries
}

/// Bonus for each globally-active date the player sat out, provided the
/// adjacent dates were also free of captures of that player.
fn untagged_day_bonus(all_tag_dates: &BTreeSet<NaiveDate>, received: &[&Tag], bonus: i32) -> i64 {
    let tagged_dates: BTreeSet<NaiveDate> =
        received.iter().map(|t| t.tagged_at.date_naive()).collect();

    let mut total = 0i64;
    for date in all_tag_dates {
        if tagged_dates.contains(date) {
            continue;
        }
        let prev_day = *date - Duration::days(1);
        let next_day = *date + Duration::days(1);
        if !tagged_dates.contains(&prev_day) && !tagged_dates.contains(&next_day) {
            total += i64::from(bonus);
        }
    }
    total
}

/// Sum of holding stretches: each capture of the player holds until the
/// next capture of that same player; the last stretch runs to `now` only
/// while the player is the current holder.
fn total_time_held(received: &[&Tag], is_current_holder: bool, now: DateTime<Utc>) -> Duration {
    let mut total = Duration::zero();
    for (i, tag) in received.iter().enumerate() {
        let stretch = if let Some(next) = received.get(i + 1) {
            next.tagged_at - tag.tagged_at
        } else if is_current_holder {
            now - tag.tagged_at
        } else {
            Duration::zero()
        };
        total += stretch;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn player(name: &str, idx: i64) -> Player {
        Player {
            player_id: Uuid::new_v4(),
            username: name.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_approved: true,
            is_participating: true,
            total_tags_given: 0,
            total_tags_received: 0,
            total_points: 0,
            total_time_held_seconds: 0,
            created_at: t0() + Duration::milliseconds(idx),
        }
    }

    fn tag(tagger: &Player, tagged: &Player, at: DateTime<Utc>, points: i32, penalty: i32) -> Tag {
        Tag {
            tag_id: Uuid::new_v4(),
            tagger_id: tagger.player_id,
            tagged_id: tagged.player_id,
            tagged_at: at,
            location: None,
            notes: None,
            photo_url: None,
            points_awarded: points,
            time_penalty: penalty,
            time_held_seconds: 0,
            verified: true,
            created_at: at,
        }
    }

    #[test]
    fn zero_events_ranks_participants_in_identity_order() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1), player("cyn", 2)];

        let board = compute_leaderboard(&settings, &players, &[], None, t0());

        assert_eq!(board.len(), 3);
        for (i, entry) in board.iter().enumerate() {
            assert_eq!(entry.rank, i as i64 + 1);
            assert_eq!(entry.points, 0);
            assert_eq!(entry.player.username, players[i].username);
        }
    }

    #[test]
    fn net_points_are_given_minus_penalties() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1)];
        let tags = vec![
            tag(&players[0], &players[1], t0(), 40, 0),
            tag(&players[1], &players[0], t0() + Duration::hours(1), 50, 5),
        ];

        let board = compute_leaderboard(&settings, &players, &tags, None, t0() + Duration::hours(2));

        let ana = board.iter().find(|e| e.player.username == "ana").unwrap();
        let bob = board.iter().find(|e| e.player.username == "bob").unwrap();
        assert_eq!(ana.points, 40 - 5);
        assert_eq!(bob.points, 50);
        assert_eq!(bob.rank, 1);
        assert_eq!(ana.rank, 2);
        assert_eq!(ana.tags_given, 1);
        assert_eq!(ana.tags_received, 1);
    }

    #[test]
    fn isolated_untagged_day_earns_bonus_once() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1), player("x", 2)];
        // Global activity on d0 and d2; player x is never tagged, so both
        // globally-active dates are isolated for x.
        let tags = vec![
            tag(&players[0], &players[1], t0(), 5, 0),
            tag(&players[1], &players[0], t0() + Duration::days(2), 5, 0),
        ];

        let board =
            compute_leaderboard(&settings, &players, &tags, None, t0() + Duration::days(3));

        let x = board.iter().find(|e| e.player.username == "x").unwrap();
        assert_eq!(x.points, 2 * 35);

        // bob was tagged on d0: d0 is out, and d2 is isolated from bob's
        // only tagged date, so bob still collects one bonus.
        let bob = board.iter().find(|e| e.player.username == "bob").unwrap();
        assert_eq!(bob.points, 5 - 0 + 35);
    }

    #[test]
    fn adjacent_tagged_day_blocks_bonus() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1)];
        // bob tagged on d0; d1 is globally active via ana. d1 is adjacent
        // to bob's tagged d0, so no bonus for d1.
        let tags = vec![
            tag(&players[0], &players[1], t0(), 5, 0),
            tag(&players[1], &players[0], t0() + Duration::days(1), 5, 0),
        ];

        let board =
            compute_leaderboard(&settings, &players, &tags, None, t0() + Duration::days(2));

        let bob = board.iter().find(|e| e.player.username == "bob").unwrap();
        assert_eq!(bob.points, 5);
    }

    #[test]
    fn time_held_extends_to_now_only_for_current_holder() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1)];
        let tags = vec![
            tag(&players[0], &players[1], t0(), 5, 0),
            tag(&players[1], &players[0], t0() + Duration::hours(3), 5, 0),
        ];
        let now = t0() + Duration::hours(5);

        let board =
            compute_leaderboard(&settings, &players, &tags, Some(players[0].player_id), now);

        // bob's stretch only closes at the next capture *of bob*. There is
        // none and bob is not the holder, so bob accrues nothing.
        let bob = board.iter().find(|e| e.player.username == "bob").unwrap();
        assert_eq!(bob.time_held_seconds, 0);

        let ana = board.iter().find(|e| e.player.username == "ana").unwrap();
        // ana is the current holder since t0+3h.
        assert_eq!(ana.time_held_seconds, Duration::hours(2).num_seconds());
    }

    #[test]
    fn repeated_computation_is_identical() {
        let settings = MemoryStore::default_settings(t0());
        let players = vec![player("ana", 0), player("bob", 1), player("cyn", 2)];
        let tags = vec![
            tag(&players[0], &players[1], t0(), 40, 0),
            tag(&players[1], &players[2], t0() + Duration::hours(2), 30, 10),
        ];
        let now = t0() + Duration::hours(4);
        let holder = Some(players[2].player_id);

        let a = compute_leaderboard(&settings, &players, &tags, holder, now);
        let b = compute_leaderboard(&settings, &players, &tags, holder, now);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.rank, y.rank);
            assert_eq!(x.player.player_id, y.player.player_id);
            assert_eq!(x.points, y.points);
            assert_eq!(x.time_held_seconds, y.time_held_seconds);
        }
    }
}
