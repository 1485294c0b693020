pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

// Re-export feed composer components
pub use services::{
    compose, mix_feed, paginate, type_targets, CandidateSet, ExploreService, FeedParams,
    FeedTypeFilter, RankMode,
};
