pub mod creators_repo;
pub mod sounds_repo;
pub mod videos_repo;

pub use creators_repo::CreatorsRepo;
pub use sounds_repo::SoundsRepo;
pub use videos_repo::VideosRepo;

use serde::{Deserialize, Serialize};

/// Recency window for candidate fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Hour,
    Day,
    Week,
    Month,
    All,
}

impl Timeframe {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Window size in hours; None means unbounded
    pub fn hours(&self) -> Option<i64> {
        match self {
            Self::Hour => Some(1),
            Self::Day => Some(24),
            Self::Week => Some(168),
            Self::Month => Some(720),
            Self::All => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build ILIKE patterns for a multi-word query: each word is matched as an
/// independent substring (OR semantics in the fetch stage).
pub fn like_patterns(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|word| format!("%{}%", word))
        .collect()
}
