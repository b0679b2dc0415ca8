// src/search/mod.rs
//! Greedy multi-round search over clang-format options.

pub mod cache;
pub mod driver;
pub mod tracker;

pub use cache::{CacheStats, ScoreCache, StyleCanonicalizer};
pub use driver::{
    CandidateEvent, NullObserver, Phase, RoundInfo, RoundRecord, SearchDriver, SearchObserver,
    SearchOutcome, SearchPlan,
};
pub use tracker::{CandidateTracker, Rank};
