use chrono::Duration;
use uuid::Uuid;

use crate::dto::achievement::NewAchievement;
use crate::dto::leaderboard::LeaderboardEntry;
use crate::models::{AchievementKind, Tag};

/// Build the full replacement achievement set from a computed leaderboard
/// and the chronological verified history.
///
/// Pure: the caller swaps the result in with a single store call, so an
/// error anywhere leaves the previous set untouched. Ties always credit
/// the first occurrence.
pub fn derive_achievements(leaderboard: &[LeaderboardEntry], tags: &[Tag]) -> Vec<NewAchievement> {
    let mut achievements = Vec::new();

    if leaderboard.is_empty() {
        return achievements;
    }

    if let Some(worst) = first_min_by(leaderboard, |e| e.points) {
        achievements.push(NewAchievement {
            player_id: worst.player.player_id,
            kind: AchievementKind::WorstPlayer,
            title: "Worst Player".to_string(),
            description: "Player with the lowest points".to_string(),
            value: format!("{} points", worst.points),
            icon: "💩".to_string(),
        });
    }

    if let Some(fastest) = first_min_by(leaderboard, |e| e.time_held_seconds) {
        achievements.push(NewAchievement {
            player_id: fastest.player.player_id,
            kind: AchievementKind::FastestPlayer,
            title: "Fastest Player".to_string(),
            description: "Player with the least time holding the tag".to_string(),
            value: format_duration(Duration::seconds(fastest.time_held_seconds)),
            icon: "⚡".to_string(),
        });
    }

    if let Some(slowest) = first_max_by(leaderboard, |e| e.time_held_seconds) {
        achievements.push(NewAchievement {
            player_id: slowest.player.player_id,
            kind: AchievementKind::SlowestPlayer,
            title: "Slowest Player".to_string(),
            description: "Player with the most time holding the tag".to_string(),
            value: format_duration(Duration::seconds(slowest.time_held_seconds)),
            icon: "🐌".to_string(),
        });
    }

    if let Some(most_active) = first_max_by(leaderboard, |e| e.tags_given) {
        achievements.push(NewAchievement {
            player_id: most_active.player.player_id,
            kind: AchievementKind::MostTagsGiven,
            title: "Most Active Tagger".to_string(),
            description: "Player who tagged others the most".to_string(),
            value: format!("{} tags", most_active.tags_given),
            icon: "🏹".to_string(),
        });
    }

    if let Some(most_caught) = first_max_by(leaderboard, |e| e.tags_received) {
        achievements.push(NewAchievement {
            player_id: most_caught.player.player_id,
            kind: AchievementKind::MostTagsReceived,
            title: "Most Caught".to_string(),
            description: "Player who was tagged the most".to_string(),
            value: format!("{} times", most_caught.tags_received),
            icon: "🎯".to_string(),
        });
    }

    achievements.extend(catch_achievements(leaderboard, tags));

    achievements
}

/// Fastest and slowest catch, from gaps between consecutive events.
/// Needs at least two verified tags; strict comparisons keep the first
/// extreme pair when several gaps tie.
fn catch_achievements(leaderboard: &[LeaderboardEntry], tags: &[Tag]) -> Vec<NewAchievement> {
    let mut achievements = Vec::new();

    if tags.len() < 2 {
        return achievements;
    }

    let mut min_gap: Option<Duration> = None;
    let mut max_gap: Option<Duration> = None;
    let mut fastest: Option<&Tag> = None;
    let mut slowest: Option<&Tag> = None;

    for pair in tags.windows(2) {
        let gap = pair[1].tagged_at - pair[0].tagged_at;

        if min_gap.is_none_or(|m| gap < m) {
            min_gap = Some(gap);
            fastest = Some(&pair[1]);
        }
        if max_gap.is_none_or(|m| gap > m) {
            max_gap = Some(gap);
            slowest = Some(&pair[1]);
        }
    }

    if let (Some(tag), Some(gap)) = (fastest, min_gap) {
        achievements.push(NewAchievement {
            player_id: tag.tagger_id,
            kind: AchievementKind::FastestCatch,
            title: "Fastest Catch".to_string(),
            description: format!("Caught {}", display_name(leaderboard, tag.tagged_id)),
            value: format_duration(gap),
            icon: "🚀".to_string(),
        });
    }

    if let (Some(tag), Some(gap)) = (slowest, max_gap) {
        achievements.push(NewAchievement {
            player_id: tag.tagged_id,
            kind: AchievementKind::SlowestCatch,
            title: "Slowest Catch".to_string(),
            description: "Held the tag for the longest time before being caught".to_string(),
            value: format_duration(gap),
            icon: "⏰".to_string(),
        });
    }

    achievements
}

fn display_name(leaderboard: &[LeaderboardEntry], player_id: Uuid) -> String {
    leaderboard
        .iter()
        .find(|e| e.player.player_id == player_id)
        .map(|e| e.player.full_name.clone())
        .unwrap_or_else(|| "the holder".to_string())
}

/// First element with the minimum key. `Iterator::min_by` keeps the last
/// tie, which is the wrong way around here.
fn first_min_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    let mut best: Option<(&T, K)> = None;
    for item in items {
        let k = key(item);
        match &best {
            Some((_, bk)) if *bk <= k => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

fn first_max_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    let mut best: Option<(&T, K)> = None;
    for item in items {
        let k = key(item);
        match &best {
            Some((_, bk)) if *bk >= k => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::leaderboard::PlayerInfo;
    use chrono::{DateTime, TimeZone, Utc};

    fn entry(name: &str, points: i64, held: i64, given: i64, received: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            player: PlayerInfo {
                player_id: Uuid::new_v4(),
                username: name.to_string(),
                full_name: name.to_string(),
            },
            points,
            tags_given: given,
            tags_received: received,
            time_held_seconds: held,
            is_current_holder: false,
        }
    }

    fn tag_at(at: DateTime<Utc>, tagger: Uuid, tagged: Uuid) -> Tag {
        Tag {
            tag_id: Uuid::new_v4(),
            tagger_id: tagger,
            tagged_id: tagged,
            tagged_at: at,
            location: None,
            notes: None,
            photo_url: None,
            points_awarded: 0,
            time_penalty: 0,
            time_held_seconds: 0,
            verified: true,
            created_at: at,
        }
    }

    #[test]
    fn empty_leaderboard_yields_no_achievements() {
        assert!(derive_achievements(&[], &[]).is_empty());
    }

    #[test]
    fn five_superlatives_without_catch_pairs() {
        let board = vec![
            entry("ana", 90, 3600, 3, 1),
            entry("bob", -10, 7200, 1, 4),
        ];

        let achievements = derive_achievements(&board, &[]);

        assert_eq!(achievements.len(), 5);
        let worst = achievements
            .iter()
            .find(|a| a.kind == AchievementKind::WorstPlayer)
            .unwrap();
        assert_eq!(worst.player_id, board[1].player.player_id);
        assert_eq!(worst.value, "-10 points");

        let most_caught = achievements
            .iter()
            .find(|a| a.kind == AchievementKind::MostTagsReceived)
            .unwrap();
        assert_eq!(most_caught.value, "4 times");
    }

    #[test]
    fn ties_credit_the_first_leaderboard_entry() {
        let board = vec![
            entry("ana", 0, 100, 2, 2),
            entry("bob", 0, 100, 2, 2),
        ];

        let achievements = derive_achievements(&board, &[]);

        for achievement in &achievements {
            assert_eq!(achievement.player_id, board[0].player.player_id);
        }
    }

    #[test]
    fn catch_pair_credits_later_tagger_and_later_tagged() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let tags = vec![
            tag_at(t0, a, b),
            tag_at(t0 + Duration::minutes(5), b, c),
            tag_at(t0 + Duration::hours(10), c, a),
        ];
        let board = vec![entry("ana", 0, 0, 1, 1)];

        let achievements = derive_achievements(&board, &tags);

        let fastest = achievements
            .iter()
            .find(|x| x.kind == AchievementKind::FastestCatch)
            .unwrap();
        // The 5-minute gap ends with b tagging c: b gets the catch.
        assert_eq!(fastest.player_id, b);
        assert_eq!(fastest.value, "0h 05m");

        let slowest = achievements
            .iter()
            .find(|x| x.kind == AchievementKind::SlowestCatch)
            .unwrap();
        // The long gap ends with a being caught: a held the tag longest.
        assert_eq!(slowest.player_id, a);
    }

    #[test]
    fn single_event_emits_no_catch_achievements() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let board = vec![entry("ana", 10, 0, 1, 0)];
        let tags = vec![tag_at(t0, Uuid::new_v4(), Uuid::new_v4())];

        let achievements = derive_achievements(&board, &tags);

        assert_eq!(achievements.len(), 5);
        assert!(
            achievements
                .iter()
                .all(|x| x.kind != AchievementKind::FastestCatch
                    && x.kind != AchievementKind::SlowestCatch)
        );
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::zero()), "0h 00m");
        assert_eq!(format_duration(Duration::minutes(179)), "2h 59m");
        assert_eq!(format_duration(Duration::hours(26)), "26h 00m");
    }
}
