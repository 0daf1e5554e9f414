use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use storage::dto::tag::{CreateTagRequest, NewTag};
use storage::error::GameError;
use storage::models::Player;
use storage::services::{GameEngine, ManualClock};
use storage::store::GameStore;
use storage::store::memory::MemoryStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn make_engine() -> (GameEngine<MemoryStore>, ManualClock) {
    let clock = ManualClock::new(t0());
    let store = MemoryStore::with_default_time(t0());
    let engine = GameEngine::new(store, Arc::new(clock.clone()));
    (engine, clock)
}

fn request(tagger: &Player, tagged: &Player) -> CreateTagRequest {
    CreateTagRequest {
        tagger_id: tagger.player_id,
        tagged_id: tagged.player_id,
        location: None,
        notes: None,
        photo_url: None,
    }
}

/// Pre-committed scoring event: `tagger` is credited `points` for catching
/// `tagged` at `at`. Used to shape the leaderboard before the call under
/// test.
async fn seed_tag(store: &MemoryStore, tagger: &Player, tagged: &Player, at: DateTime<Utc>, points: i32) {
    store
        .commit_tag(NewTag {
            tagger_id: tagger.player_id,
            tagged_id: tagged.player_id,
            tagged_at: at,
            location: None,
            notes: None,
            photo_url: None,
            points_awarded: points,
            time_penalty: 0,
            time_held_seconds: 0,
            verified: true,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn first_tag_of_fresh_game_is_accepted() {
    let (engine, _clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;

    assert!(engine.resolve_holder().await.unwrap().is_none());

    let tag = engine.process_tag(request(&ana, &bob)).await.unwrap();

    assert_eq!(tag.tagger_id, ana.player_id);
    assert_eq!(tag.tagged_id, bob.player_id);
    assert_eq!(tag.time_penalty, 0);
    assert_eq!(tag.time_held_seconds, 0);
    assert!(tag.verified);

    // The most recent verified event's tagged player is the holder.
    assert_eq!(engine.resolve_holder().await.unwrap(), Some(bob.player_id));
}

#[tokio::test]
async fn tagging_anyone_but_the_holder_fails_with_wrong_holder() {
    let (engine, _clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let cyn = engine.store().add_player("cyn", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();

    let err = engine.process_tag(request(&cyn, &ana)).await.unwrap_err();
    match err {
        GameError::WrongHolder { tagged, holder } => {
            assert_eq!(tagged, "ana");
            assert_eq!(holder, "bob");
        }
        other => panic!("expected WrongHolder, got {other:?}"),
    }

    // The holder themselves can still be tagged by anyone.
    engine.process_tag(request(&cyn, &bob)).await.unwrap();
    assert_eq!(engine.resolve_holder().await.unwrap(), Some(bob.player_id));
}

#[tokio::test]
async fn pinned_holder_overrides_event_history() {
    let (engine, _clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;

    let mut settings = MemoryStore::default_settings(t0());
    settings.current_holder = Some(ana.player_id);
    settings.holder_since = Some(t0());
    engine.store().put_settings(settings).await;

    assert_eq!(engine.resolve_holder().await.unwrap(), Some(ana.player_id));

    let err = engine.process_tag(request(&ana, &bob)).await.unwrap_err();
    assert!(matches!(err, GameError::WrongHolder { .. }));

    engine.process_tag(request(&bob, &ana)).await.unwrap();
}

#[tokio::test]
async fn inactive_game_rejects_tags() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;

    // The window is [start, end): the start instant is playable, the end
    // instant is not.
    clock.set(t0() - Duration::seconds(1));
    let err = engine.process_tag(request(&ana, &bob)).await.unwrap_err();
    assert!(matches!(err, GameError::GameNotActive));

    clock.set(t0());
    engine.process_tag(request(&ana, &bob)).await.unwrap();

    clock.set(t0() + Duration::days(30));
    let err = engine.process_tag(request(&bob, &bob)).await.unwrap_err();
    assert!(matches!(err, GameError::GameNotActive));
}

#[tokio::test]
async fn unapproved_and_nonparticipating_players_are_rejected() {
    let (engine, _clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", false, true).await;
    let cyn = engine.store().add_player("cyn", true, false).await;

    let err = engine.process_tag(request(&ana, &bob)).await.unwrap_err();
    assert!(matches!(err, GameError::NotApproved));

    let err = engine.process_tag(request(&cyn, &ana)).await.unwrap_err();
    match err {
        GameError::NotParticipating { username } => assert_eq!(username, "cyn"),
        other => panic!("expected NotParticipating, got {other:?}"),
    }

    let err = engine.process_tag(request(&ana, &cyn)).await.unwrap_err();
    match err {
        GameError::NotParticipating { username } => assert_eq!(username, "cyn"),
        other => panic!("expected NotParticipating, got {other:?}"),
    }
}

#[tokio::test]
async fn tagging_the_top_ranked_player_pays_the_top_of_the_table() {
    let (engine, _clock) = make_engine();
    let target = engine.store().add_player("target", true, true).await;
    let other = engine.store().add_player("other", true, true).await;
    let hunter = engine.store().add_player("hunter", true, true).await;

    // target leads the board before the tag under test.
    seed_tag(engine.store(), &target, &other, t0() - Duration::hours(1), 100).await;

    let mut settings = MemoryStore::default_settings(t0());
    settings.current_holder = Some(target.player_id);
    engine.store().put_settings(settings).await;

    let tag = engine.process_tag(request(&hunter, &target)).await.unwrap();
    assert_eq!(tag.points_awarded, 50);
}

#[tokio::test]
async fn tagging_rank_seven_pays_the_bottom_tier() {
    let (engine, _clock) = make_engine();
    let mut players = Vec::new();
    for i in 0..7 {
        players.push(
            engine
                .store()
                .add_player(&format!("p{i}"), true, true)
                .await,
        );
    }

    // p0..p5 score 100, 90, .., 50 on one shared date, each also getting
    // tagged once so nobody among them collects the isolated-day bonus.
    // p6 stays at just the bonus and sits at rank 7.
    let seed_at = t0() - Duration::days(3);
    for i in 0..6 {
        let tagged = &players[(i + 1) % 6];
        seed_tag(engine.store(), &players[i], tagged, seed_at, 100 - 10 * i as i32).await;
    }

    let mut settings = MemoryStore::default_settings(t0());
    settings.current_holder = Some(players[6].player_id);
    engine.store().put_settings(settings).await;

    let board = engine.calculate_leaderboard().await.unwrap();
    assert_eq!(board.last().unwrap().player.username, "p6");
    assert_eq!(board.last().unwrap().rank, 7);

    let tag = engine
        .process_tag(request(&players[0], &players[6]))
        .await
        .unwrap();
    assert_eq!(tag.points_awarded, 5);
}

#[tokio::test]
async fn penalty_counts_only_full_hours_held() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let cyn = engine.store().add_player("cyn", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();

    clock.advance(Duration::hours(2) + Duration::minutes(59));
    let tag = engine.process_tag(request(&cyn, &bob)).await.unwrap();
    assert_eq!(tag.time_penalty, 2 * 5);
    assert_eq!(
        tag.time_held_seconds,
        (Duration::hours(2) + Duration::minutes(59)).num_seconds()
    );

    clock.advance(Duration::hours(3));
    let tag = engine.process_tag(request(&ana, &bob)).await.unwrap();
    assert_eq!(tag.time_penalty, 3 * 5);
}

#[tokio::test]
async fn penalty_runs_from_the_tagged_players_own_previous_capture() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let dee = engine.store().add_player("dee", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();

    // An hour later someone else gets caught. Pinning the holder back to
    // bob keeps him taggable even though the latest event tagged ana.
    seed_tag(engine.store(), &bob, &ana, t0() + Duration::hours(1), 10).await;
    let mut settings = MemoryStore::default_settings(t0());
    settings.current_holder = Some(bob.player_id);
    engine.store().put_settings(settings).await;

    // bob's stretch runs from his own capture at t0, not from the more
    // recent event that tagged ana.
    clock.set(t0() + Duration::hours(3));
    let tag = engine.process_tag(request(&dee, &bob)).await.unwrap();
    assert_eq!(tag.time_held_seconds, Duration::hours(3).num_seconds());
    assert_eq!(tag.time_penalty, 3 * 5);
}

#[tokio::test]
async fn three_player_scenario() {
    let (engine, clock) = make_engine();
    let p1 = engine.store().add_player("p1", true, true).await;
    let p2 = engine.store().add_player("p2", true, true).await;
    let p3 = engine.store().add_player("p3", true, true).await;

    // First tag of the game: no holder yet, so any pair is allowed.
    let first = engine.process_tag(request(&p1, &p2)).await.unwrap();
    assert_eq!(first.time_penalty, 0);
    // Before the event everyone is at 0 points, so p2 ranks second in
    // identity order and the tag prices at the rank-2 slot.
    assert_eq!(first.points_awarded, 40);
    assert_eq!(engine.resolve_holder().await.unwrap(), Some(p2.player_id));

    // Achievements already replaced after one event: the five leaderboard
    // superlatives, no catch pair yet.
    assert_eq!(engine.store().achievements().await.len(), 5);

    // p2 is caught again two hours later and pays for two full hours.
    clock.advance(Duration::hours(2));
    let second = engine.process_tag(request(&p3, &p2)).await.unwrap();
    assert_eq!(second.time_penalty, 2 * 5);
    assert_eq!(second.time_held_seconds, Duration::hours(2).num_seconds());
    assert_eq!(engine.resolve_holder().await.unwrap(), Some(p2.player_id));

    // With two events the catch achievements join the set.
    let achievements = engine.store().achievements().await;
    assert!(achievements.len() >= 5);
    assert_eq!(achievements.len(), 7);
}

#[tokio::test]
async fn achievement_recalculation_is_deterministic() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let cyn = engine.store().add_player("cyn", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();
    clock.advance(Duration::minutes(30));
    engine.process_tag(request(&cyn, &bob)).await.unwrap();

    engine.recalculate_achievements().await.unwrap();
    let first: Vec<_> = engine
        .store()
        .achievements()
        .await
        .iter()
        .map(|a| (a.kind, a.player_id, a.value.clone()))
        .collect();

    engine.recalculate_achievements().await.unwrap();
    let second: Vec<_> = engine
        .store()
        .achievements()
        .await
        .iter()
        .map(|a| (a.kind, a.player_id, a.value.clone()))
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn no_participants_means_no_achievements() {
    let (engine, _clock) = make_engine();

    engine.recalculate_achievements().await.unwrap();
    assert!(engine.store().achievements().await.is_empty());
    assert!(engine.calculate_leaderboard().await.unwrap().is_empty());
}

#[tokio::test]
async fn leaderboard_is_idempotent_between_writes() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();
    clock.advance(Duration::hours(1));

    let a = engine.calculate_leaderboard().await.unwrap();
    let b = engine.calculate_leaderboard().await.unwrap();

    let key = |board: &[storage::dto::leaderboard::LeaderboardEntry]| {
        board
            .iter()
            .map(|e| (e.rank, e.player.player_id, e.points, e.time_held_seconds))
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&a), key(&b));
}

#[tokio::test]
async fn cached_player_stats_match_event_log_totals() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let cyn = engine.store().add_player("cyn", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();
    clock.advance(Duration::hours(1) + Duration::minutes(10));
    engine.process_tag(request(&cyn, &bob)).await.unwrap();
    clock.advance(Duration::hours(4));
    engine.process_tag(request(&ana, &bob)).await.unwrap();

    let tags = engine.store().all_tags().await;
    for player in [&ana, &bob, &cyn] {
        let cached = engine.store().find_player(player.player_id).await.unwrap();

        let given: Vec<_> = tags.iter().filter(|t| t.tagger_id == player.player_id).collect();
        let received: Vec<_> = tags.iter().filter(|t| t.tagged_id == player.player_id).collect();

        assert_eq!(cached.total_tags_given, given.len() as i64);
        assert_eq!(cached.total_tags_received, received.len() as i64);
        assert_eq!(
            cached.total_points,
            given.iter().map(|t| i64::from(t.points_awarded)).sum::<i64>()
                - received.iter().map(|t| i64::from(t.time_penalty)).sum::<i64>()
        );
        assert_eq!(
            cached.total_time_held_seconds,
            received.iter().map(|t| t.time_held_seconds).sum::<i64>()
        );
    }
}

#[tokio::test]
async fn concurrent_tags_on_the_same_holder_serialize() {
    let (engine, clock) = make_engine();
    let ana = engine.store().add_player("ana", true, true).await;
    let bob = engine.store().add_player("bob", true, true).await;
    let cyn = engine.store().add_player("cyn", true, true).await;
    let dee = engine.store().add_player("dee", true, true).await;

    engine.process_tag(request(&ana, &bob)).await.unwrap();
    clock.advance(Duration::hours(2));

    // Two simultaneous catches of the holder serialize on the game lock.
    // Whichever commits first closes bob's two-hour stretch; the loser
    // must price against that commit as bob's new previous capture, so
    // exactly one of the two events carries the two-hour penalty.
    let engine = Arc::new(engine);
    let a = {
        let engine = Arc::clone(&engine);
        let req = request(&cyn, &bob);
        tokio::spawn(async move { engine.process_tag(req).await })
    };
    let b = {
        let engine = Arc::clone(&engine);
        let req = request(&dee, &bob);
        tokio::spawn(async move { engine.process_tag(req).await })
    };

    let first = a.await.unwrap().unwrap();
    let second = b.await.unwrap().unwrap();

    let mut held = [first.time_held_seconds, second.time_held_seconds];
    held.sort_unstable();
    assert_eq!(held, [0, Duration::hours(2).num_seconds()]);

    let mut penalties = [first.time_penalty, second.time_penalty];
    penalties.sort_unstable();
    assert_eq!(penalties, [0, 2 * 5]);
}
