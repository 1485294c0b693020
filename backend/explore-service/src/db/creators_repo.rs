/// Creator candidate queries
///
/// The recent engagement aggregate sums counters over the creator's videos
/// from the last seven days; it feeds both the trending and relevance scorers.
use sqlx::PgPool;
use tracing::error;

use crate::error::{AppError, Result};
use crate::models::CreatorSummary;

const RECENT_ENGAGEMENT_SELECT: &str = r#"
    COALESCE((
        SELECT SUM(v.likes_count + v.comments_count + v.shares_count)
        FROM videos v
        WHERE v.user_id = u.id
            AND v.created_at >= NOW() - INTERVAL '7 days'
    ), 0)::BIGINT
"#;

pub struct CreatorsRepo {
    pool: PgPool,
}

impl CreatorsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List trending-mode creator candidates ordered by follower count
    pub async fn list_candidates(&self, limit: i64, offset: i64) -> Result<Vec<CreatorSummary>> {
        let query = format!(
            r#"
            SELECT
                u.id, u.username, u.display_name, u.bio, u.avatar_url,
                u.verified, u.followers_count,
                {RECENT_ENGAGEMENT_SELECT} AS recent_engagement
            FROM users u
            ORDER BY u.followers_count DESC
            LIMIT $1 OFFSET $2
            "#
        );

        sqlx::query_as::<_, CreatorSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list creator candidates: {}", e);
                AppError::Database(e.to_string())
            })
    }

    /// List search-mode creator candidates matching on handle, name or bio
    pub async fn search(
        &self,
        patterns: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreatorSummary>> {
        let query = format!(
            r#"
            SELECT
                u.id, u.username, u.display_name, u.bio, u.avatar_url,
                u.verified, u.followers_count,
                {RECENT_ENGAGEMENT_SELECT} AS recent_engagement
            FROM users u
            WHERE u.username ILIKE ANY($1)
                OR u.display_name ILIKE ANY($1)
                OR u.bio ILIKE ANY($1)
            ORDER BY u.followers_count DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, CreatorSummary>(&query)
            .bind(patterns)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to search creators: {}", e);
                AppError::Database(e.to_string())
            })
    }
}
