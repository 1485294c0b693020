//! Mixer/interleaver and paginator for the explore feed
//!
//! Merges three pre-sorted per-type lists into one presentation-ordered
//! sequence under positional quotas: every 5th absolute position is reserved
//! for a creator, every 8th for a sound. The creator rule is checked first,
//! so a position divisible by both 5 and 8 (40, 80, ...) always yields a
//! creator, never a sound. That precedence is a fixed tie-break and must not
//! be "fixed" to alternate.
//!
//! The mixer consumes from the front of each list (highest score first) and
//! never re-sorts. When a type runs out, its reserved slots fall through in
//! priority order video -> creator -> sound rather than leaving gaps.

use std::collections::VecDeque;

use crate::models::{FeedItem, Pagination};

/// Interleave pre-sorted per-type lists into a single sequence.
///
/// Positions are 1-based: the first creator slot is position 5, the first
/// sound slot position 8.
pub fn mix_feed(
    videos: Vec<FeedItem>,
    creators: Vec<FeedItem>,
    sounds: Vec<FeedItem>,
) -> Vec<FeedItem> {
    let total = videos.len() + creators.len() + sounds.len();
    let mut videos: VecDeque<FeedItem> = videos.into();
    let mut creators: VecDeque<FeedItem> = creators.into();
    let mut sounds: VecDeque<FeedItem> = sounds.into();

    let mut mixed = Vec::with_capacity(total);
    for position in 1..=total {
        let item = if position % 5 == 0 {
            creators
                .pop_front()
                .or_else(|| videos.pop_front())
                .or_else(|| sounds.pop_front())
        } else if position % 8 == 0 {
            sounds
                .pop_front()
                .or_else(|| videos.pop_front())
                .or_else(|| creators.pop_front())
        } else {
            videos
                .pop_front()
                .or_else(|| creators.pop_front())
                .or_else(|| sounds.pop_front())
        };

        match item {
            Some(item) => mixed.push(item),
            None => break,
        }
    }

    mixed
}

/// Truncate the mixed sequence to the requested page size.
///
/// `has_more` is a heuristic: true iff the returned slice is exactly `limit`
/// long. It under-reports on an exact final page; documented limitation.
pub fn paginate(
    mut mixed: Vec<FeedItem>,
    limit: usize,
    offset: i64,
) -> (Vec<FeedItem>, Pagination) {
    mixed.truncate(limit);
    let has_more = mixed.len() == limit;

    (
        mixed,
        Pagination {
            limit,
            offset,
            has_more,
        },
    )
}
