//! cfbfeed library
//!
//! Fetches tabular college-football data published as CSV, normalizes it into
//! `Record`s and caches the result, serving the last good table when the
//! upstream source is unavailable.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod data;
pub mod feed;

pub use data::{Record, TableResponse};
pub use feed::{FeedConfig, FeedError, TableFeed};
