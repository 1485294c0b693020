/// Sound candidate queries
///
/// Usage count is a denormalized counter maintained by the content layer;
/// recent engagement sums counters over recent videos that reference the sound.
use sqlx::PgPool;
use tracing::error;

use crate::error::{AppError, Result};
use crate::models::SoundSummary;

const RECENT_ENGAGEMENT_SELECT: &str = r#"
    COALESCE((
        SELECT SUM(v.likes_count + v.comments_count + v.shares_count)
        FROM videos v
        WHERE v.sound_id = s.id
            AND v.created_at >= NOW() - INTERVAL '7 days'
    ), 0)::BIGINT
"#;

pub struct SoundsRepo {
    pool: PgPool,
}

impl SoundsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List trending-mode sound candidates ordered by usage
    pub async fn list_candidates(&self, limit: i64, offset: i64) -> Result<Vec<SoundSummary>> {
        let query = format!(
            r#"
            SELECT
                s.id, s.title, s.artist_name, s.audio_url, s.duration_secs,
                s.usage_count,
                {RECENT_ENGAGEMENT_SELECT} AS recent_engagement
            FROM sounds s
            ORDER BY s.usage_count DESC
            LIMIT $1 OFFSET $2
            "#
        );

        sqlx::query_as::<_, SoundSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list sound candidates: {}", e);
                AppError::Database(e.to_string())
            })
    }

    /// List search-mode sound candidates matching on title or artist
    pub async fn search(
        &self,
        patterns: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SoundSummary>> {
        let query = format!(
            r#"
            SELECT
                s.id, s.title, s.artist_name, s.audio_url, s.duration_secs,
                s.usage_count,
                {RECENT_ENGAGEMENT_SELECT} AS recent_engagement
            FROM sounds s
            WHERE s.title ILIKE ANY($1)
                OR s.artist_name ILIKE ANY($1)
            ORDER BY s.usage_count DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, SoundSummary>(&query)
            .bind(patterns)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to search sounds: {}", e);
                AppError::Database(e.to_string())
            })
    }
}
