use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Video candidate with engagement counters (read-only view over content rows)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub duration_secs: i32,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_id: Option<Uuid>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub views_count: i64,
    pub shares_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Creator candidate with follower count and recent video engagement aggregate
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub verified: bool,
    pub followers_count: i64,
    pub recent_engagement: i64,
}

/// Sound candidate with usage count (videos referencing it)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SoundSummary {
    pub id: Uuid,
    pub title: String,
    pub artist_name: String,
    pub audio_url: String,
    pub duration_secs: i32,
    pub usage_count: i64,
    pub recent_engagement: i64,
}

/// Content type tag for a feed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedItemKind {
    Video,
    User,
    Sound,
}

impl FeedItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => "video",
            Self::User => "user",
            Self::Sound => "sound",
        }
    }
}

impl std::fmt::Display for FeedItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation aspect ratio for grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "1:2")]
    Tall,
    #[serde(rename = "2:3")]
    Portrait,
    #[serde(rename = "9:16")]
    FullHeight,
    #[serde(rename = "2:1")]
    Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Square => "1:1",
            Self::Tall => "1:2",
            Self::Portrait => "2:3",
            Self::FullHeight => "9:16",
            Self::Wide => "2:1",
        }
    }
}

/// Source data carried by a composed feed item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedContent {
    Video(VideoSummary),
    User(CreatorSummary),
    Sound(SoundSummary),
}

/// One entry in the composed feed. Built fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Stable id prefixed by kind to avoid cross-type collisions
    pub id: String,
    pub kind: FeedItemKind,
    pub aspect_ratio: AspectRatio,
    /// Computed ranking score (trending or relevance, depending on mode)
    pub priority: f64,
    #[serde(flatten)]
    pub content: FeedContent,
}

impl FeedItem {
    pub fn video(video: VideoSummary, priority: f64, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: format!("video-{}", video.id),
            kind: FeedItemKind::Video,
            aspect_ratio,
            priority,
            content: FeedContent::Video(video),
        }
    }

    pub fn user(creator: CreatorSummary, priority: f64, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: format!("user-{}", creator.id),
            kind: FeedItemKind::User,
            aspect_ratio,
            priority,
            content: FeedContent::User(creator),
        }
    }

    pub fn sound(sound: SoundSummary, priority: f64, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: format!("sound-{}", sound.id),
            kind: FeedItemKind::Sound,
            aspect_ratio,
            priority,
            content: FeedContent::Sound(sound),
        }
    }
}

/// Pagination metadata returned with every feed page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: usize,
    pub offset: i64,
    /// Heuristic: true iff the returned slice is exactly `limit` long.
    /// Under-reports on an exact final page; kept as-is intentionally.
    pub has_more: bool,
}

/// Response envelope for the mixed explore feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub success: bool,
    pub feed: Vec<FeedItem>,
    pub pagination: Pagination,
}

/// Response envelope for single-type explore sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub success: bool,
    pub section: String,
    pub items: Vec<FeedItem>,
    pub pagination: Pagination,
}

/// Category entry for the categories section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_str() {
        assert_eq!(FeedItemKind::Video.as_str(), "video");
        assert_eq!(FeedItemKind::User.as_str(), "user");
        assert_eq!(FeedItemKind::Sound.as_str(), "sound");
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::FullHeight).unwrap();
        assert_eq!(json, "\"9:16\"");
        let json = serde_json::to_string(&AspectRatio::Wide).unwrap();
        assert_eq!(json, "\"2:1\"");
    }

    #[test]
    fn test_feed_item_id_is_kind_prefixed() {
        let video = VideoSummary {
            id: Uuid::nil(),
            title: "t".to_string(),
            description: None,
            video_url: "u".to_string(),
            thumbnail_url: None,
            duration_secs: 10,
            user_id: Uuid::nil(),
            sound_id: None,
            likes_count: 0,
            comments_count: 0,
            views_count: 0,
            shares_count: 0,
            created_at: Utc::now(),
        };
        let item = FeedItem::video(video, 1.0, AspectRatio::Square);
        assert!(item.id.starts_with("video-"));
    }
}
