//! Cache entry model and on-disk format
//!
//! Entries are stored as one `<key>.json` file per key. The stored shape has
//! drifted across schema versions: the `result` field is either the analysis
//! text itself (current) or a nested object carrying its own `result` and
//! `visualizations` (legacy double-wrapped entries, and entries whose
//! timestamps were written without a timezone). Both shapes are modeled
//! explicitly and normalized into a flat [`CacheEntry`] once, at read time.

use crate::error::{CacheError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single generated visualization referenced by an analysis result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visualization {
    /// Display title
    pub title: String,
    /// Short description of what the visualization shows
    pub description: String,
    /// Path to the rendered image, relative to the visualization root
    pub path: String,
}

/// The `result` field as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredResult {
    /// Current format: the analysis text itself
    Text(String),
    /// Legacy format: a full entry object was written into the result slot
    Nested {
        result: String,
        #[serde(default)]
        visualizations: Option<Vec<Visualization>>,
    },
}

/// On-disk entry format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub result: StoredResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualizations: Option<Vec<Visualization>>,
    /// ISO-8601 creation time; legacy writers emitted timezone-naive stamps
    pub timestamp: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl StoredEntry {
    /// Build a fresh entry stamped with the current time and the given
    /// schema version
    pub fn new(
        result: String,
        visualizations: Option<Vec<Visualization>>,
        version: &str,
    ) -> Self {
        Self {
            result: StoredResult::Text(result),
            visualizations,
            timestamp: Utc::now().to_rfc3339(),
            version: Some(version.to_string()),
        }
    }

    /// Flatten the stored shape into a normalized [`CacheEntry`]
    ///
    /// Legacy double-wrapped results are unwrapped; a missing version
    /// normalizes to `"unknown"`, which no validity check accepts. Fails
    /// only on an unparsable timestamp.
    pub fn normalize(self, key: &str) -> Result<CacheEntry> {
        let timestamp = parse_timestamp(&self.timestamp).ok_or_else(|| {
            CacheError::CorruptEntry {
                key: key.to_string(),
                reason: format!("unparsable timestamp '{}'", self.timestamp),
            }
        })?;

        let (result, nested_visualizations) = match self.result {
            StoredResult::Text(text) => (text, None),
            StoredResult::Nested {
                result,
                visualizations,
            } => (result, visualizations),
        };

        Ok(CacheEntry {
            key: key.to_string(),
            result,
            visualizations: self.visualizations.or(nested_visualizations),
            timestamp,
            version: self.version.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// A normalized cache entry, immutable once written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Hex digest the entry is stored under (taken from the filename)
    pub key: String,
    /// The analysis payload
    pub result: String,
    /// Optional visualization manifest
    pub visualizations: Option<Vec<Visualization>>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Schema version tag
    pub version: String,
}

impl CacheEntry {
    /// Whole days elapsed since the entry was written
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.timestamp).num_days()
    }
}

/// Parse an ISO-8601 timestamp, accepting both RFC 3339 and the
/// timezone-naive form legacy writers produced (naive stamps are read
/// as UTC)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
