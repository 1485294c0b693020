pub mod explore;

pub use explore::{get_explore_feed, get_explore_section};
