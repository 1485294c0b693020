/// Explore/Discovery API Handlers
///
/// HTTP endpoints for the mixed explore feed and the per-section lists.
/// Both endpoints are public; a valid bearer token personalizes results,
/// anything else is served as anonymous.
use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{debug, error};

use crate::db::Timeframe;
use crate::error::{AppError, FieldError, Result};
use crate::models::Category;
use crate::security::jwt::viewer_from_request;
use crate::services::{ExploreService, FeedParams, FeedTypeFilter};

/// Page size bounds for both endpoints
const MIN_LIMIT: i64 = 1;
const MAX_LIMIT: i64 = 50;
const DEFAULT_LIMIT: i64 = 20;

/// Query parameters for GET /api/v1/explore/feed
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub query: Option<String>,
    /// Content type filter: "all", "videos", "users", "sounds"
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Query parameters for GET /api/v1/explore
#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
    pub category: Option<String>,
    /// Recency window: "hour", "day", "week", "month", "all"
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Explore section selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Trending,
    Creators,
    Categories,
    Sounds,
    Recommendations,
}

/// Parse and validate feed query params, collecting every field failure
/// rather than stopping at the first.
fn validate_feed_query(query: &FeedQuery) -> Result<FeedParams> {
    let mut errors: Vec<FieldError> = Vec::new();

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT) as usize;

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        errors.push(FieldError::new("offset", "must be greater than or equal to 0"));
    }

    let content_type = match query.content_type.as_deref() {
        None => FeedTypeFilter::All,
        Some(raw) => match parse_type_filter(raw) {
            Ok(filter) => filter,
            Err(message) => {
                errors.push(FieldError::new("type", message));
                FeedTypeFilter::All
            }
        },
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(FeedParams {
        limit,
        offset,
        query: query.query.clone(),
        content_type,
    })
}

/// GET /api/v1/explore/feed
///
/// Mixed explore feed across videos, creators and sounds. A query of two or
/// more characters switches from trending to search mode.
#[get("/api/v1/explore/feed")]
pub async fn get_explore_feed(
    query: web::Query<FeedQuery>,
    req: HttpRequest,
    service: web::Data<ExploreService>,
) -> Result<HttpResponse> {
    let params = validate_feed_query(&query)?;
    let viewer = viewer_from_request(&req);

    let response = service.feed(&params, viewer).await.map_err(|e| {
        error!("Failed to compose explore feed: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/explore
///
/// Type-specific content list for one explore section.
#[get("/api/v1/explore")]
pub async fn get_explore_section(
    query: web::Query<SectionQuery>,
    req: HttpRequest,
    service: web::Data<ExploreService>,
) -> Result<HttpResponse> {
    let mut errors: Vec<FieldError> = Vec::new();

    let section = match query.section.as_deref() {
        None => Section::Trending,
        Some(raw) => match parse_section(raw) {
            Ok(section) => section,
            Err(message) => {
                errors.push(FieldError::new("section", message));
                Section::Trending
            }
        },
    };

    let timeframe = match query.timeframe.as_deref() {
        None => Timeframe::Day,
        Some(raw) => match parse_timeframe(raw) {
            Ok(timeframe) => timeframe,
            Err(message) => {
                errors.push(FieldError::new("timeframe", message));
                Timeframe::Day
            }
        },
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT) as usize;

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        errors.push(FieldError::new("offset", "must be greater than or equal to 0"));
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let viewer = viewer_from_request(&req);

    debug!(
        "Explore section request: section={:?} timeframe={} limit={} offset={}",
        section, timeframe, limit, offset
    );

    let response = match section {
        Section::Trending => {
            let body = service
                .trending_section(timeframe, query.category.as_deref(), limit, offset, viewer)
                .await?;
            HttpResponse::Ok().json(body)
        }
        Section::Creators => {
            let body = service.creators_section(limit, offset).await?;
            HttpResponse::Ok().json(body)
        }
        Section::Sounds => {
            let body = service.sounds_section(limit, offset).await?;
            HttpResponse::Ok().json(body)
        }
        Section::Recommendations => {
            let body = service
                .recommendations_section(timeframe, limit, offset, viewer)
                .await?;
            HttpResponse::Ok().json(body)
        }
        Section::Categories => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "categories": category_catalogue(),
        })),
    };

    Ok(response)
}

/// Static category catalogue for the categories section
fn category_catalogue() -> Vec<Category> {
    [
        ("comedy", "Comedy"),
        ("dance", "Dance"),
        ("music", "Music"),
        ("gaming", "Gaming"),
        ("sports", "Sports"),
        ("food", "Food"),
        ("fashion", "Fashion"),
        ("education", "Education"),
    ]
    .iter()
    .map(|(name, label)| Category {
        name: name.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Parse content type filter string
fn parse_type_filter(s: &str) -> std::result::Result<FeedTypeFilter, String> {
    match s.to_lowercase().as_str() {
        "all" => Ok(FeedTypeFilter::All),
        "videos" => Ok(FeedTypeFilter::Videos),
        "users" => Ok(FeedTypeFilter::Users),
        "sounds" => Ok(FeedTypeFilter::Sounds),
        _ => Err(format!(
            "Invalid type: {}. Must be one of: all, videos, users, sounds",
            s
        )),
    }
}

/// Parse section string
fn parse_section(s: &str) -> std::result::Result<Section, String> {
    match s.to_lowercase().as_str() {
        "trending" => Ok(Section::Trending),
        "creators" => Ok(Section::Creators),
        "categories" => Ok(Section::Categories),
        "sounds" => Ok(Section::Sounds),
        "recommendations" => Ok(Section::Recommendations),
        _ => Err(format!(
            "Invalid section: {}. Must be one of: trending, creators, categories, sounds, recommendations",
            s
        )),
    }
}

/// Parse timeframe string
fn parse_timeframe(s: &str) -> std::result::Result<Timeframe, String> {
    match s.to_lowercase().as_str() {
        "hour" => Ok(Timeframe::Hour),
        "day" => Ok(Timeframe::Day),
        "week" => Ok(Timeframe::Week),
        "month" => Ok(Timeframe::Month),
        "all" => Ok(Timeframe::All),
        _ => Err(format!(
            "Invalid timeframe: {}. Must be one of: hour, day, week, month, all",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_query(
        limit: Option<i64>,
        offset: Option<i64>,
        content_type: Option<&str>,
    ) -> FeedQuery {
        FeedQuery {
            limit,
            offset,
            query: None,
            content_type: content_type.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_parse_type_filter() {
        assert!(parse_type_filter("all").is_ok());
        assert!(parse_type_filter("videos").is_ok());
        assert!(parse_type_filter("users").is_ok());
        assert!(parse_type_filter("sounds").is_ok());
        assert!(parse_type_filter("invalid").is_err());
    }

    #[test]
    fn test_parse_section() {
        assert!(parse_section("trending").is_ok());
        assert!(parse_section("creators").is_ok());
        assert!(parse_section("categories").is_ok());
        assert!(parse_section("sounds").is_ok());
        assert!(parse_section("recommendations").is_ok());
        assert!(parse_section("invalid").is_err());
    }

    #[test]
    fn test_parse_timeframe() {
        assert!(parse_timeframe("hour").is_ok());
        assert!(parse_timeframe("day").is_ok());
        assert!(parse_timeframe("week").is_ok());
        assert!(parse_timeframe("month").is_ok());
        assert!(parse_timeframe("all").is_ok());
        assert!(parse_timeframe("invalid").is_err());
    }

    #[test]
    fn test_limit_clamped_not_rejected() {
        let params = validate_feed_query(&feed_query(Some(500), None, None)).unwrap();
        assert_eq!(params.limit, 50);
        let params = validate_feed_query(&feed_query(Some(0), None, None)).unwrap();
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn test_defaults_applied() {
        let params = validate_feed_query(&feed_query(None, None, None)).unwrap();
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert_eq!(params.content_type, FeedTypeFilter::All);
    }

    #[test]
    fn test_negative_offset_is_a_field_error() {
        let err = validate_feed_query(&feed_query(None, Some(-1), None)).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "offset");
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_multiple_field_errors_collected() {
        let err = validate_feed_query(&feed_query(None, Some(-5), Some("bogus"))).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["offset", "type"]);
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_category_catalogue_is_nonempty() {
        assert!(!category_catalogue().is_empty());
    }
}
