//! Content-addressed analysis cache
//!
//! This module stores previously computed analysis results as JSON files,
//! one per fingerprint key, and validates entries on read by age, schema
//! version, and a content denylist. Invalid entries are evicted lazily as
//! a side effect of lookup; a sweep performs the long-horizon cleanup.

mod storage;

pub use storage::{clear_cache, AnalysisCache, CacheStats, SweepStats};
