//! End-to-end composition tests on in-memory candidates: scoring, layout,
//! interleaving and pagination, without a database.

use chrono::{Duration, Utc};
use uuid::Uuid;

use explore_service::models::{CreatorSummary, FeedItemKind, SoundSummary, VideoSummary};
use explore_service::{compose, CandidateSet, RankMode};

fn video(title: &str, likes: i64, views: i64, age_hours: i64) -> VideoSummary {
    VideoSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        video_url: "https://cdn.example/v.mp4".to_string(),
        thumbnail_url: None,
        duration_secs: 30,
        user_id: Uuid::new_v4(),
        sound_id: None,
        likes_count: likes,
        comments_count: 0,
        views_count: views,
        shares_count: 0,
        created_at: Utc::now() - Duration::hours(age_hours),
    }
}

fn creator(username: &str, followers: i64) -> CreatorSummary {
    CreatorSummary {
        id: Uuid::new_v4(),
        username: username.to_string(),
        display_name: None,
        bio: None,
        avatar_url: None,
        verified: false,
        followers_count: followers,
        recent_engagement: 0,
    }
}

fn sound(title: &str, usage: i64) -> SoundSummary {
    SoundSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        artist_name: "artist".to_string(),
        audio_url: "https://cdn.example/s.mp3".to_string(),
        duration_secs: 15,
        usage_count: usage,
        recent_engagement: 0,
    }
}

fn full_candidates() -> CandidateSet {
    CandidateSet {
        videos: (0..60).map(|n| video(&format!("video {}", n), 100, 1000, 1)).collect(),
        creators: (0..12).map(|n| creator(&format!("creator{}", n), 1000)).collect(),
        sounds: (0..8).map(|n| sound(&format!("sound {}", n), 100)).collect(),
    }
}

#[test]
fn feed_length_never_exceeds_limit() {
    for limit in [1usize, 5, 20, 50] {
        let (feed, pagination) = compose(full_candidates(), &RankMode::Trending, limit, 0);
        assert!(feed.len() <= limit);
        assert_eq!(pagination.limit, limit);
    }
}

#[test]
fn creator_slots_every_fifth_position() {
    let (feed, _) = compose(full_candidates(), &RankMode::Trending, 50, 0);
    for position in [5usize, 10, 15, 20, 25, 30, 35, 45] {
        assert_eq!(
            feed[position - 1].kind,
            FeedItemKind::User,
            "position {}",
            position
        );
    }
}

#[test]
fn position_forty_favors_creator_over_sound() {
    let (feed, _) = compose(full_candidates(), &RankMode::Trending, 50, 0);
    assert_eq!(feed[39].kind, FeedItemKind::User);
}

#[test]
fn sound_slots_every_eighth_position_outside_collisions() {
    let (feed, _) = compose(full_candidates(), &RankMode::Trending, 50, 0);
    for position in [8usize, 16, 24, 32, 48] {
        assert_eq!(
            feed[position - 1].kind,
            FeedItemKind::Sound,
            "position {}",
            position
        );
    }
}

#[test]
fn empty_candidates_produce_empty_feed_without_has_more() {
    let (feed, pagination) = compose(
        CandidateSet::default(),
        &RankMode::Search("zzznomatch".to_string()),
        20,
        0,
    );
    assert!(feed.is_empty());
    assert!(!pagination.has_more);
}

#[test]
fn single_type_candidates_yield_single_kind_feed() {
    let candidates = CandidateSet {
        videos: vec![],
        creators: (0..20).map(|n| creator(&format!("creator{}", n), 1000)).collect(),
        sounds: vec![],
    };
    let (feed, _) = compose(candidates, &RankMode::Trending, 20, 0);
    assert_eq!(feed.len(), 20);
    assert!(feed.iter().all(|item| item.kind == FeedItemKind::User));
}

#[test]
fn search_mode_is_deterministic() {
    let candidates = || CandidateSet {
        videos: vec![
            video("lofi mix", 10, 100, 1),
            video("cooking", 500, 5000, 1),
            video("lofi study session", 50, 800, 2),
        ],
        creators: vec![creator("lofigirl", 2000), creator("chef", 9000)],
        sounds: vec![sound("lofi loop", 300), sound("sizzle", 50)],
    };

    let mode = RankMode::Search("lofi".to_string());
    let (first, _) = compose(candidates(), &mode, 20, 0);
    let (second, _) = compose(candidates(), &mode, 20, 0);

    // Ids differ between runs (fresh UUIDs), but kind order and the
    // deterministic relevance scores must not.
    let shape = |feed: &[explore_service::models::FeedItem]| {
        feed.iter()
            .map(|i| (i.kind, i.priority.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn search_ranks_title_matches_above_popular_non_matches() {
    let candidates = CandidateSet {
        videos: vec![
            video("unrelated but popular", 2000, 5000, 1),
            video("lofi beats", 0, 0, 1),
        ],
        creators: vec![],
        sounds: vec![],
    };
    let (feed, _) = compose(candidates, &RankMode::Search("lofi".to_string()), 20, 0);

    // title bonus (100) beats (views+likes)/100 = 70
    assert_eq!(feed[0].priority, 100.0);
    assert!(feed[0].priority > feed[1].priority);
}

#[test]
fn trending_ranks_fresh_engagement_above_stale() {
    let candidates = CandidateSet {
        videos: vec![
            video("stale", 100_000, 100_000, 24 * 30),
            video("fresh", 100_000, 100_000, 1),
        ],
        creators: vec![],
        sounds: vec![],
    };
    let (feed, _) = compose(candidates, &RankMode::Trending, 20, 0);

    // Scores differ by far more than the +-100 jitter bound
    assert!(feed[0].priority > feed[1].priority);
    assert!(feed[0].id.starts_with("video-"));
}

#[test]
fn every_item_id_is_kind_prefixed() {
    let (feed, _) = compose(full_candidates(), &RankMode::Trending, 50, 0);
    for item in &feed {
        let prefix = format!("{}-", item.kind);
        assert!(item.id.starts_with(&prefix), "id {} kind {}", item.id, item.kind);
    }
}

#[test]
fn pagination_reports_has_more_only_on_full_pages() {
    let (_, full_page) = compose(full_candidates(), &RankMode::Trending, 20, 0);
    assert!(full_page.has_more);

    let small = CandidateSet {
        videos: vec![video("only one", 10, 10, 1)],
        creators: vec![],
        sounds: vec![],
    };
    let (_, short_page) = compose(small, &RankMode::Trending, 20, 0);
    assert!(!short_page.has_more);
}
