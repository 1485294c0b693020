//! Aspect-ratio assignment for the presentation grid
//!
//! Pure functions of (item attributes, positional index): the only randomness
//! in the composer lives in the trending scorer's jitter, never here, so
//! layout is fully testable.

use crate::models::{AspectRatio, CreatorSummary, SoundSummary, VideoSummary};
use crate::services::scoring::video_engagement;

/// Weighted engagement above which a video gets the highlight treatment
const HIGH_ENGAGEMENT_THRESHOLD: i64 = 10_000;

/// Trending score above which a video gets the highlight treatment
const TRENDING_SCORE_THRESHOLD: f64 = 500.0;

/// Follower count above which an unverified creator gets the tall card cycle
const HIGH_FOLLOWER_THRESHOLD: i64 = 10_000;

/// Usage count above which a sound gets a wide card
const WIDE_SOUND_THRESHOLD: i64 = 1_000;

/// Ratio for a video at position `index` within the video list.
///
/// High-engagement or high-scoring videos alternate between a tall and a
/// full-height card every third item; everything else cycles a three-ratio
/// rotation keyed by `index mod 3`.
pub fn video_aspect_ratio(video: &VideoSummary, index: usize, score: f64) -> AspectRatio {
    let highlighted = video_engagement(video) > HIGH_ENGAGEMENT_THRESHOLD
        || score > TRENDING_SCORE_THRESHOLD;

    if highlighted {
        if (index / 3) % 2 == 0 {
            AspectRatio::FullHeight
        } else {
            AspectRatio::Tall
        }
    } else {
        match index % 3 {
            0 => AspectRatio::Square,
            1 => AspectRatio::Portrait,
            _ => AspectRatio::Tall,
        }
    }
}

/// Ratio for a creator card: verified or high-follower creators get a tall
/// card every fourth slot, otherwise square.
pub fn creator_aspect_ratio(creator: &CreatorSummary, index: usize) -> AspectRatio {
    let prominent = creator.verified || creator.followers_count > HIGH_FOLLOWER_THRESHOLD;

    if prominent && index % 4 == 0 {
        AspectRatio::Tall
    } else {
        AspectRatio::Square
    }
}

/// Ratio for a sound card: wide when heavily used, else square.
pub fn sound_aspect_ratio(sound: &SoundSummary) -> AspectRatio {
    if sound.usage_count > WIDE_SOUND_THRESHOLD {
        AspectRatio::Wide
    } else {
        AspectRatio::Square
    }
}
