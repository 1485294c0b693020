//! Trending and relevance scorers for the explore feed
//!
//! Trending mode ranks by recency-decayed engagement: a sub-linear age
//! penalty lets fresh, modestly-engaged content surface without old viral
//! content dominating indefinitely. Shares carry the highest weight.
//!
//! Search mode ranks by case-insensitive substring bonuses on the primary
//! and secondary text fields plus a scaled popularity term. No stemming,
//! no fuzzy matching.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::{CreatorSummary, SoundSummary, VideoSummary};

/// Age decay exponent; sub-linear so the penalty grows slower than age
const AGE_DECAY_EXPONENT: f64 = 0.8;

/// Fixed trending bonus for verified creators
const VERIFIED_BONUS: f64 = 500.0;

/// Relevance bonus for an exact substring match on the primary field
const PRIMARY_MATCH_BONUS: f64 = 100.0;

/// Relevance bonus for a match on the display name / artist field
const SECONDARY_MATCH_BONUS: f64 = 80.0;

/// Relevance bonus for a match on the bio / description field
const TERTIARY_MATCH_BONUS: f64 = 50.0;

/// Maximum magnitude of the anti-staleness jitter at position zero
const JITTER_AMPLITUDE: f64 = 100.0;

/// Minimum query length (in characters) that triggers search mode
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Whether a query string switches the feed into search mode
pub fn is_search_query(query: Option<&str>) -> bool {
    query
        .map(|q| q.trim().chars().count() >= MIN_SEARCH_QUERY_LEN)
        .unwrap_or(false)
}

/// Weighted engagement for a video: shares carry the most distribution value
pub fn video_engagement(video: &VideoSummary) -> i64 {
    video.likes_count * 2 + video.comments_count * 3 + video.shares_count * 4 + video.views_count
}

/// Hours since creation, never negative
fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - created_at).num_minutes().max(0) as f64) / 60.0
}

/// Trending score for a video: engagement / max(1, (age_hours + 1)^0.8)
pub fn trending_video_score(video: &VideoSummary, now: DateTime<Utc>) -> f64 {
    let engagement = video_engagement(video) as f64;
    let decay = (age_hours(video.created_at, now) + 1.0)
        .powf(AGE_DECAY_EXPONENT)
        .max(1.0);
    engagement / decay
}

/// Trending score for a creator
pub fn trending_creator_score(creator: &CreatorSummary) -> f64 {
    let verified_bonus = if creator.verified { VERIFIED_BONUS } else { 0.0 };
    creator.followers_count as f64 / 1000.0 + creator.recent_engagement as f64 + verified_bonus
}

/// Trending score for a sound
pub fn trending_sound_score(sound: &SoundSummary) -> f64 {
    sound.usage_count as f64 + sound.recent_engagement as f64 / 100.0
}

/// Bounded random jitter added in explore mode only, scaled down by position
/// so the head of the feed stays mostly score-ordered. This is a deliberate
/// anti-staleness device: repeated requests should not return a perfectly
/// deterministic ordering.
pub fn position_jitter(index: usize, rng: &mut impl Rng) -> f64 {
    rng.gen_range(-JITTER_AMPLITUDE..=JITTER_AMPLITUDE) / (index as f64 + 1.0)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Relevance score for a video: title is the primary field
pub fn relevance_video_score(video: &VideoSummary, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let mut score = 0.0;

    if contains_ci(&video.title, &query) {
        score += PRIMARY_MATCH_BONUS;
    }
    if let Some(description) = &video.description {
        if contains_ci(description, &query) {
            score += TERTIARY_MATCH_BONUS;
        }
    }

    score + (video.views_count + video.likes_count) as f64 / 100.0
}

/// Relevance score for a creator: username is the primary field
pub fn relevance_creator_score(creator: &CreatorSummary, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let mut score = 0.0;

    if contains_ci(&creator.username, &query) {
        score += PRIMARY_MATCH_BONUS;
    }
    if let Some(display_name) = &creator.display_name {
        if contains_ci(display_name, &query) {
            score += SECONDARY_MATCH_BONUS;
        }
    }
    if let Some(bio) = &creator.bio {
        if contains_ci(bio, &query) {
            score += TERTIARY_MATCH_BONUS;
        }
    }

    score + creator.followers_count as f64 / 100.0
}

/// Relevance score for a sound: title is the primary field, usage counts raw
pub fn relevance_sound_score(sound: &SoundSummary, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let mut score = 0.0;

    if contains_ci(&sound.title, &query) {
        score += PRIMARY_MATCH_BONUS;
    }
    if contains_ci(&sound.artist_name, &query) {
        score += SECONDARY_MATCH_BONUS;
    }

    score + sound.usage_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn test_video(
        likes: i64,
        comments: i64,
        shares: i64,
        views: i64,
        age: Duration,
    ) -> VideoSummary {
        VideoSummary {
            id: Uuid::new_v4(),
            title: "Morning routine".to_string(),
            description: Some("lofi beats to relax to".to_string()),
            video_url: "https://cdn.example/v.mp4".to_string(),
            thumbnail_url: None,
            duration_secs: 30,
            user_id: Uuid::new_v4(),
            sound_id: None,
            likes_count: likes,
            comments_count: comments,
            views_count: views,
            shares_count: shares,
            created_at: Utc::now() - age,
        }
    }

    fn test_creator(followers: i64, verified: bool, recent: i64) -> CreatorSummary {
        CreatorSummary {
            id: Uuid::new_v4(),
            username: "dancequeen".to_string(),
            display_name: Some("Dance Queen".to_string()),
            bio: Some("daily choreo".to_string()),
            avatar_url: None,
            verified,
            followers_count: followers,
            recent_engagement: recent,
        }
    }

    fn test_sound(usage: i64, recent: i64) -> SoundSummary {
        SoundSummary {
            id: Uuid::new_v4(),
            title: "Midnight Drive".to_string(),
            artist_name: "Neon Arcade".to_string(),
            audio_url: "https://cdn.example/s.mp3".to_string(),
            duration_secs: 15,
            usage_count: usage,
            recent_engagement: recent,
        }
    }

    #[test]
    fn test_video_engagement_weights() {
        let video = test_video(100, 50, 10, 1000, Duration::hours(1));
        // 100*2 + 50*3 + 10*4 + 1000 = 1390
        assert_eq!(video_engagement(&video), 1390);
    }

    #[test]
    fn test_trending_score_one_hour_old() {
        let video = test_video(100, 50, 10, 1000, Duration::hours(1));
        let score = trending_video_score(&video, Utc::now());
        // 1390 / (2^0.8) = 1390 / 1.741 ~= 798
        assert!((score - 798.0).abs() < 2.0, "score was {}", score);
    }

    #[test]
    fn test_trending_score_decays_with_age() {
        let fresh = test_video(10, 10, 10, 100, Duration::hours(1));
        let stale = test_video(10, 10, 10, 100, Duration::hours(48));
        let now = Utc::now();
        assert!(trending_video_score(&fresh, now) > trending_video_score(&stale, now));
    }

    #[test]
    fn test_trending_score_future_timestamp_clamps_to_zero_age() {
        let mut video = test_video(10, 0, 0, 0, Duration::hours(0));
        video.created_at = Utc::now() + Duration::hours(5);
        let score = trending_video_score(&video, Utc::now());
        // age clamps to 0 so the decay divisor is 1
        assert!((score - 20.0).abs() < 0.5, "score was {}", score);
    }

    #[test]
    fn test_creator_score_verified_bonus() {
        let verified = test_creator(5000, true, 100);
        let plain = test_creator(5000, false, 100);
        let diff = trending_creator_score(&verified) - trending_creator_score(&plain);
        assert_eq!(diff, 500.0);
    }

    #[test]
    fn test_sound_score_scales_engagement_down() {
        let sound = test_sound(200, 1000);
        assert_eq!(trending_sound_score(&sound), 210.0);
    }

    #[test]
    fn test_jitter_is_bounded_and_shrinks_with_position() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let head = position_jitter(0, &mut rng);
            assert!(head.abs() <= 100.0);
            let deep = position_jitter(9, &mut rng);
            assert!(deep.abs() <= 10.0);
        }
    }

    #[test]
    fn test_search_mode_gate_on_query_length() {
        assert!(is_search_query(Some("ab")));
        assert!(!is_search_query(Some("a")));
        assert!(!is_search_query(Some("  ")));
        assert!(!is_search_query(None));
    }

    #[test]
    fn test_relevance_title_match_is_case_insensitive() {
        let video = test_video(0, 0, 0, 0, Duration::hours(1));
        let matched = relevance_video_score(&video, "MORNING");
        let unmatched = relevance_video_score(&video, "evening");
        assert_eq!(matched, 100.0);
        assert_eq!(unmatched, 0.0);
    }

    #[test]
    fn test_relevance_description_match_is_smaller_bonus() {
        let video = test_video(0, 0, 0, 0, Duration::hours(1));
        assert_eq!(relevance_video_score(&video, "lofi"), 50.0);
    }

    #[test]
    fn test_relevance_creator_fields_stack() {
        let creator = test_creator(0, false, 0);
        // "dance" hits username ("dancequeen") and display name ("Dance Queen")
        assert_eq!(relevance_creator_score(&creator, "dance"), 180.0);
    }

    #[test]
    fn test_relevance_sound_popularity_is_raw_usage() {
        let sound = test_sound(42, 0);
        assert_eq!(relevance_sound_score(&sound, "zzz"), 42.0);
        assert_eq!(relevance_sound_score(&sound, "midnight"), 142.0);
    }
}
