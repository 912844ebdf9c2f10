//! Configuration types for papercache

use std::path::PathBuf;

/// Default cache directory when none is configured
pub const DEFAULT_CACHE_DIR: &str = ".paper-cache";

/// Maximum entry age (in days) accepted by lookup
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Long-horizon retention limit (in days) enforced by sweep
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Schema version written on store
pub const CURRENT_VERSION: &str = "4.0";

/// Schema versions accepted by lookup
pub const ACCEPTED_VERSIONS: &[&str] = &["3.0", "4.0"];

/// Configuration options for the analysis cache
///
/// Passed explicitly into [`AnalysisCache::new`](crate::cache::AnalysisCache::new);
/// the cache carries no ambient global state.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory where entry files are stored
    pub cache_dir: PathBuf,

    /// Entries older than this (in days) are stale and evicted on lookup
    pub max_age_days: i64,

    /// Entries older than this (in days) are removed by sweep regardless
    /// of version
    pub retention_days: i64,

    /// Schema versions considered valid for reuse
    pub accepted_versions: Vec<String>,

    /// Schema version tag written on new entries; sweep removes entries
    /// carrying any other version
    pub current_version: String,

    /// Allow lookup to fall back to scanning all stored keys when every
    /// candidate key misses. The returned entry may not correspond to the
    /// requested artifact; off by default.
    pub allow_unrelated_fallback: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            retention_days: DEFAULT_RETENTION_DAYS,
            accepted_versions: ACCEPTED_VERSIONS.iter().map(|v| v.to_string()).collect(),
            current_version: CURRENT_VERSION.to_string(),
            allow_unrelated_fallback: false,
        }
    }
}

impl CacheConfig {
    /// Create a configuration rooted at the given cache directory with
    /// default validity rules
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Whether a version string is acceptable for reuse on lookup
    pub fn is_accepted_version(&self, version: &str) -> bool {
        self.accepted_versions.iter().any(|v| v == version)
    }
}
