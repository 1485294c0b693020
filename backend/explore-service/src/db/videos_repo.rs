/// Video candidate queries
///
/// Reads public videos, plus private videos from creators the authenticated
/// viewer follows. Counters are denormalized on the videos table; this repo
/// performs no writes.
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::VideoSummary;

use super::Timeframe;

const VIDEO_SELECT: &str = r#"
    v.id, v.title, v.description, v.video_url, v.thumbnail_url,
    v.duration_secs, v.user_id, v.sound_id,
    v.likes_count, v.comments_count, v.views_count, v.shares_count,
    v.created_at
"#;

pub struct VideosRepo {
    pool: PgPool,
}

impl VideosRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List trending-mode candidates within a recency window
    pub async fn list_candidates(
        &self,
        limit: i64,
        offset: i64,
        viewer: Option<Uuid>,
        timeframe: Timeframe,
        category: Option<&str>,
    ) -> Result<Vec<VideoSummary>> {
        let query = format!(
            r#"
            SELECT {VIDEO_SELECT}
            FROM videos v
            WHERE (v.visibility = 'public'
                OR ($1::UUID IS NOT NULL AND v.user_id IN (
                    SELECT followed_id FROM follows WHERE follower_id = $1)))
                AND ($2::BIGINT IS NULL OR v.created_at >= NOW() - INTERVAL '1 hour' * $2)
                AND ($3::VARCHAR IS NULL OR v.category = $3)
            ORDER BY v.created_at DESC
            LIMIT $4 OFFSET $5
            "#
        );

        sqlx::query_as::<_, VideoSummary>(&query)
            .bind(viewer)
            .bind(timeframe.hours())
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list video candidates: {}", e);
                AppError::Database(e.to_string())
            })
    }

    /// List search-mode candidates: each query word matched as an independent
    /// substring on title or description
    pub async fn search(
        &self,
        patterns: &[String],
        limit: i64,
        offset: i64,
        viewer: Option<Uuid>,
    ) -> Result<Vec<VideoSummary>> {
        let query = format!(
            r#"
            SELECT {VIDEO_SELECT}
            FROM videos v
            WHERE (v.visibility = 'public'
                OR ($1::UUID IS NOT NULL AND v.user_id IN (
                    SELECT followed_id FROM follows WHERE follower_id = $1)))
                AND (v.title ILIKE ANY($2) OR v.description ILIKE ANY($2))
            ORDER BY v.views_count DESC
            LIMIT $3 OFFSET $4
            "#
        );

        sqlx::query_as::<_, VideoSummary>(&query)
            .bind(viewer)
            .bind(patterns)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to search videos: {}", e);
                AppError::Database(e.to_string())
            })
    }

    /// List recent videos from creators the viewer follows (recommendations)
    pub async fn list_from_followed(
        &self,
        viewer: Uuid,
        limit: i64,
        offset: i64,
        timeframe: Timeframe,
    ) -> Result<Vec<VideoSummary>> {
        let query = format!(
            r#"
            SELECT {VIDEO_SELECT}
            FROM videos v
            WHERE v.user_id IN (
                    SELECT followed_id FROM follows WHERE follower_id = $1)
                AND ($2::BIGINT IS NULL OR v.created_at >= NOW() - INTERVAL '1 hour' * $2)
            ORDER BY v.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );

        sqlx::query_as::<_, VideoSummary>(&query)
            .bind(viewer)
            .bind(timeframe.hours())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list followed videos: {}", e);
                AppError::Database(e.to_string())
            })
    }
}
