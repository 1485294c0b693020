//! Service layer for explore-service
//!
//! Active modules:
//! - scoring: trending and relevance scorers
//! - layout: deterministic aspect-ratio assignment for the grid
//! - mixer: positional-quota interleaver and paginator
//! - explore: the request-scoped feed composer tying it all together

pub mod explore;
pub mod layout;
pub mod mixer;
pub mod scoring;

pub use explore::{
    compose, type_targets, CandidateSet, ExploreService, FeedParams, FeedTypeFilter, RankMode,
};
pub use mixer::{mix_feed, paginate};
