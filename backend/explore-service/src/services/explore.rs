//! Explore feed composer
//!
//! Orchestrates the full pipeline: fetch candidates per content type
//! (concurrently, with per-type failure isolation), score them, assign
//! presentation ratios, interleave, and paginate. All state is request-scoped;
//! nothing is cached or persisted between requests.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::{like_patterns, CreatorsRepo, SoundsRepo, Timeframe, VideosRepo};
use crate::error::Result;
use crate::models::{
    CreatorSummary, FeedItem, FeedResponse, Pagination, SectionResponse, SoundSummary, VideoSummary,
};
use crate::services::layout::{creator_aspect_ratio, sound_aspect_ratio, video_aspect_ratio};
use crate::services::mixer::{mix_feed, paginate};
use crate::services::scoring::{
    is_search_query, position_jitter, relevance_creator_score, relevance_sound_score,
    relevance_video_score, trending_creator_score, trending_sound_score, trending_video_score,
};

/// Default recency window for trending-mode feed candidates
const DEFAULT_FEED_TIMEFRAME: Timeframe = Timeframe::Week;

/// Content type filter for the mixed feed endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedTypeFilter {
    All,
    Videos,
    Users,
    Sounds,
}

impl FeedTypeFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Videos => "videos",
            Self::Users => "users",
            Self::Sounds => "sounds",
        }
    }
}

/// Validated parameters for the mixed feed endpoint
#[derive(Debug, Clone)]
pub struct FeedParams {
    pub limit: usize,
    pub offset: i64,
    pub query: Option<String>,
    pub content_type: FeedTypeFilter,
}

/// Candidate summaries fetched per content type, before scoring
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub videos: Vec<VideoSummary>,
    pub creators: Vec<CreatorSummary>,
    pub sounds: Vec<SoundSummary>,
}

/// Ranking mode for a feed request
#[derive(Debug, Clone, PartialEq)]
pub enum RankMode {
    /// Recency-decayed engagement, with bounded anti-staleness jitter
    Trending,
    /// Text-match bonuses plus popularity, fully deterministic
    Search(String),
}

/// Per-type fetch targets derived from the requested page size.
///
/// Videos carry the bulk of the page; creators and sounds are sized to the
/// mixer's positional quotas (every 5th and every 8th slot).
pub fn type_targets(filter: FeedTypeFilter, limit: usize) -> (usize, usize, usize) {
    match filter {
        FeedTypeFilter::All => (limit, (limit / 5).max(1), (limit / 8).max(1)),
        FeedTypeFilter::Videos => (limit, 0, 0),
        FeedTypeFilter::Users => (0, limit, 0),
        FeedTypeFilter::Sounds => (0, 0, limit),
    }
}

/// Score, sort, assign ratios, interleave and paginate a candidate set.
///
/// Pure apart from the trending jitter; search mode is fully deterministic.
pub fn compose(
    candidates: CandidateSet,
    mode: &RankMode,
    limit: usize,
    offset: i64,
) -> (Vec<FeedItem>, Pagination) {
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    let mut videos: Vec<(f64, VideoSummary)> = candidates
        .videos
        .into_iter()
        .map(|v| {
            let score = match mode {
                RankMode::Trending => trending_video_score(&v, now),
                RankMode::Search(query) => relevance_video_score(&v, query),
            };
            (score, v)
        })
        .collect();

    let mut creators: Vec<(f64, CreatorSummary)> = candidates
        .creators
        .into_iter()
        .map(|c| {
            let score = match mode {
                RankMode::Trending => trending_creator_score(&c),
                RankMode::Search(query) => relevance_creator_score(&c, query),
            };
            (score, c)
        })
        .collect();

    let mut sounds: Vec<(f64, SoundSummary)> = candidates
        .sounds
        .into_iter()
        .map(|s| {
            let score = match mode {
                RankMode::Trending => trending_sound_score(&s),
                RankMode::Search(query) => relevance_sound_score(&s, query),
            };
            (score, s)
        })
        .collect();

    videos.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    creators.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    sounds.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    // Jitter applies after the sort so the pre-sorted lists the mixer consumes
    // stay mostly score-ordered at the head; explore mode only.
    let video_items: Vec<FeedItem> = videos
        .into_iter()
        .enumerate()
        .map(|(index, (mut score, video))| {
            if matches!(mode, RankMode::Trending) {
                score += position_jitter(index, &mut rng);
            }
            let ratio = video_aspect_ratio(&video, index, score);
            FeedItem::video(video, score, ratio)
        })
        .collect();

    let creator_items: Vec<FeedItem> = creators
        .into_iter()
        .enumerate()
        .map(|(index, (score, creator))| {
            let ratio = creator_aspect_ratio(&creator, index);
            FeedItem::user(creator, score, ratio)
        })
        .collect();

    let sound_items: Vec<FeedItem> = sounds
        .into_iter()
        .enumerate()
        .map(|(_index, (score, sound))| {
            let ratio = sound_aspect_ratio(&sound);
            FeedItem::sound(sound, score, ratio)
        })
        .collect();

    let mixed = mix_feed(video_items, creator_items, sound_items);
    paginate(mixed, limit, offset)
}

/// Merge per-type fetch results into a candidate set.
///
/// A failed fetch degrades that type to an empty list and never aborts the
/// request: a mixed feed with one starved type beats a 500.
fn collect_candidates(
    videos: Result<Vec<VideoSummary>>,
    creators: Result<Vec<CreatorSummary>>,
    sounds: Result<Vec<SoundSummary>>,
) -> CandidateSet {
    CandidateSet {
        videos: videos.unwrap_or_else(|e| {
            warn!("Video fetch failed, serving feed without videos: {}", e);
            vec![]
        }),
        creators: creators.unwrap_or_else(|e| {
            warn!("Creator fetch failed, serving feed without creators: {}", e);
            vec![]
        }),
        sounds: sounds.unwrap_or_else(|e| {
            warn!("Sound fetch failed, serving feed without sounds: {}", e);
            vec![]
        }),
    }
}

/// Explore feed service
pub struct ExploreService {
    videos: VideosRepo,
    creators: CreatorsRepo,
    sounds: SoundsRepo,
    overfetch_multiplier: u32,
}

impl ExploreService {
    pub fn new(pool: PgPool, overfetch_multiplier: u32) -> Self {
        Self {
            videos: VideosRepo::new(pool.clone()),
            creators: CreatorsRepo::new(pool.clone()),
            sounds: SoundsRepo::new(pool),
            overfetch_multiplier: overfetch_multiplier.max(1),
        }
    }

    fn fetch_count(&self, target: usize) -> i64 {
        (target as i64) * (self.overfetch_multiplier as i64)
    }

    /// Compose the mixed explore/search feed.
    pub async fn feed(&self, params: &FeedParams, viewer: Option<Uuid>) -> Result<FeedResponse> {
        let (video_target, creator_target, sound_target) =
            type_targets(params.content_type, params.limit);

        let mode = if is_search_query(params.query.as_deref()) {
            RankMode::Search(params.query.clone().unwrap_or_default())
        } else {
            RankMode::Trending
        };

        debug!(
            "Explore feed request: mode={} type={} limit={} offset={} viewer={:?}",
            match &mode {
                RankMode::Trending => "trending",
                RankMode::Search(_) => "search",
            },
            params.content_type.as_str(),
            params.limit,
            params.offset,
            viewer
        );

        let candidates = self
            .fetch_candidates(
                &mode,
                video_target,
                creator_target,
                sound_target,
                params.offset,
                viewer,
            )
            .await;

        let (feed, pagination) = compose(candidates, &mode, params.limit, params.offset);

        Ok(FeedResponse {
            success: true,
            feed,
            pagination,
        })
    }

    /// Fetch the three candidate lists concurrently.
    async fn fetch_candidates(
        &self,
        mode: &RankMode,
        video_target: usize,
        creator_target: usize,
        sound_target: usize,
        offset: i64,
        viewer: Option<Uuid>,
    ) -> CandidateSet {
        let video_count = self.fetch_count(video_target);
        let creator_count = self.fetch_count(creator_target);
        let sound_count = self.fetch_count(sound_target);

        let video_fut = async {
            if video_target == 0 {
                return Ok(vec![]);
            }
            match mode {
                RankMode::Trending => {
                    self.videos
                        .list_candidates(video_count, offset, viewer, DEFAULT_FEED_TIMEFRAME, None)
                        .await
                }
                RankMode::Search(query) => {
                    self.videos
                        .search(&like_patterns(query), video_count, offset, viewer)
                        .await
                }
            }
        };

        let creator_fut = async {
            if creator_target == 0 {
                return Ok(vec![]);
            }
            match mode {
                RankMode::Trending => self.creators.list_candidates(creator_count, offset).await,
                RankMode::Search(query) => {
                    self.creators
                        .search(&like_patterns(query), creator_count, offset)
                        .await
                }
            }
        };

        let sound_fut = async {
            if sound_target == 0 {
                return Ok(vec![]);
            }
            match mode {
                RankMode::Trending => self.sounds.list_candidates(sound_count, offset).await,
                RankMode::Search(query) => {
                    self.sounds
                        .search(&like_patterns(query), sound_count, offset)
                        .await
                }
            }
        };

        let (videos, creators, sounds) = tokio::join!(video_fut, creator_fut, sound_fut);

        collect_candidates(videos, creators, sounds)
    }

    /// Trending videos section, windowed and optionally category-filtered.
    pub async fn trending_section(
        &self,
        timeframe: Timeframe,
        category: Option<&str>,
        limit: usize,
        offset: i64,
        viewer: Option<Uuid>,
    ) -> Result<SectionResponse> {
        let now = Utc::now();
        let videos = self
            .videos
            .list_candidates(self.fetch_count(limit), offset, viewer, timeframe, category)
            .await?;

        let mut scored: Vec<(f64, VideoSummary)> = videos
            .into_iter()
            .map(|v| (trending_video_score(&v, now), v))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let items: Vec<FeedItem> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (score, video))| {
                let ratio = video_aspect_ratio(&video, index, score);
                FeedItem::video(video, score, ratio)
            })
            .collect();

        let (items, pagination) = paginate(items, limit, offset);
        Ok(SectionResponse {
            success: true,
            section: "trending".to_string(),
            items,
            pagination,
        })
    }

    /// Top creators section.
    pub async fn creators_section(
        &self,
        limit: usize,
        offset: i64,
    ) -> Result<SectionResponse> {
        let creators = self
            .creators
            .list_candidates(self.fetch_count(limit), offset)
            .await?;

        let mut scored: Vec<(f64, CreatorSummary)> = creators
            .into_iter()
            .map(|c| (trending_creator_score(&c), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let items: Vec<FeedItem> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (score, creator))| {
                let ratio = creator_aspect_ratio(&creator, index);
                FeedItem::user(creator, score, ratio)
            })
            .collect();

        let (items, pagination) = paginate(items, limit, offset);
        Ok(SectionResponse {
            success: true,
            section: "creators".to_string(),
            items,
            pagination,
        })
    }

    /// Top sounds section.
    pub async fn sounds_section(&self, limit: usize, offset: i64) -> Result<SectionResponse> {
        let sounds = self
            .sounds
            .list_candidates(self.fetch_count(limit), offset)
            .await?;

        let mut scored: Vec<(f64, SoundSummary)> = sounds
            .into_iter()
            .map(|s| (trending_sound_score(&s), s))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let items: Vec<FeedItem> = scored
            .into_iter()
            .map(|(score, sound)| {
                let ratio = sound_aspect_ratio(&sound);
                FeedItem::sound(sound, score, ratio)
            })
            .collect();

        let (items, pagination) = paginate(items, limit, offset);
        Ok(SectionResponse {
            success: true,
            section: "sounds".to_string(),
            items,
            pagination,
        })
    }

    /// Recommendations section: recent videos from followed creators for
    /// authenticated viewers, trending fallback for anonymous callers.
    pub async fn recommendations_section(
        &self,
        timeframe: Timeframe,
        limit: usize,
        offset: i64,
        viewer: Option<Uuid>,
    ) -> Result<SectionResponse> {
        let Some(viewer) = viewer else {
            let mut response = self
                .trending_section(timeframe, None, limit, offset, None)
                .await?;
            response.section = "recommendations".to_string();
            return Ok(response);
        };

        let now = Utc::now();
        let videos = self
            .videos
            .list_from_followed(viewer, self.fetch_count(limit), offset, timeframe)
            .await?;

        let mut scored: Vec<(f64, VideoSummary)> = videos
            .into_iter()
            .map(|v| (trending_video_score(&v, now), v))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let items: Vec<FeedItem> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (score, video))| {
                let ratio = video_aspect_ratio(&video, index, score);
                FeedItem::video(video, score, ratio)
            })
            .collect();

        let (items, pagination) = paginate(items, limit, offset);
        Ok(SectionResponse {
            success: true,
            section: "recommendations".to_string(),
            items,
            pagination,
        })
    }
}
