//! papercache - Content-addressed analysis cache
//!
//! Stores computed analysis results for uploaded research papers, keyed by
//! fingerprints of the artifact, so a re-upload of the same paper is served
//! from cache instead of recomputed. Entries are JSON files validated on
//! read by age, schema version, and a content denylist; invalid entries are
//! evicted lazily on lookup, with a sweep for long-horizon cleanup.
//!
//! Typical request-handler flow:
//!
//! ```no_run
//! use papercache::cache::AnalysisCache;
//! use papercache::config::CacheConfig;
//! use papercache::fingerprint::{content_fingerprint, text_fingerprint};
//!
//! # fn compute_analysis(_text: &str) -> String { String::new() }
//! # fn run(bytes: &[u8], extracted_text: &str) -> papercache::error::Result<()> {
//! let cache = AnalysisCache::new(CacheConfig::default())?;
//! let keys = vec![
//!     content_fingerprint(bytes),
//!     text_fingerprint(extracted_text),
//! ];
//!
//! let result = match cache.lookup(&keys) {
//!     Some(entry) => entry.result,
//!     None => {
//!         let fresh = compute_analysis(extracted_text);
//!         // A failed store never fails the request
//!         if let Err(e) = cache.store(&keys[0], &fresh, None) {
//!             tracing::warn!("Failed to cache analysis: {e}");
//!         }
//!         fresh
//!     }
//! };
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod quarantine;

pub use cache::{clear_cache, AnalysisCache, CacheStats, SweepStats};
pub use config::CacheConfig;
pub use entry::{CacheEntry, Visualization};
pub use error::{CacheError, Result};
pub use quarantine::{DenylistPolicy, QuarantinePolicy};
