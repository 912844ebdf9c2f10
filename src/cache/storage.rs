//! Cache storage implementation

use crate::config::CacheConfig;
use crate::entry::{CacheEntry, StoredEntry, Visualization};
use crate::error::{CacheError, Result};
use crate::quarantine::{DenylistPolicy, QuarantinePolicy};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// How an entry fares against the validity rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryStatus {
    /// Safe to serve
    Valid,
    /// Result matches the denylist
    Quarantined,
    /// Too old, or carries an unaccepted schema version
    Stale,
}

/// Outcome of a [`AnalysisCache::sweep`] pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Entries examined
    pub examined: usize,
    /// Entries deleted
    pub removed: usize,
}

/// Read-only breakdown of the entries currently stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub stale: usize,
    pub quarantined: usize,
    pub corrupt: usize,
}

/// Content-addressed store for analysis results
///
/// Entries are immutable once written; storing under an existing key
/// replaces the entry wholesale (last write wins). No internal locking:
/// concurrent duplicate deletes are no-ops and concurrent stores resolve
/// through atomic rename.
pub struct AnalysisCache {
    /// Validity rules and storage location
    config: CacheConfig,
    /// Content denylist predicate
    policy: Box<dyn QuarantinePolicy>,
}

impl AnalysisCache {
    /// Create a cache with the default denylist policy
    ///
    /// # Arguments
    /// * `config` - Storage location and validity rules
    ///
    /// # Returns
    /// An AnalysisCache instance, or an error if the cache directory cannot
    /// be created
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_policy(config, Box::new(DenylistPolicy::default()))
    }

    /// Create a cache with an injected quarantine policy
    pub fn with_policy(config: CacheConfig, policy: Box<dyn QuarantinePolicy>) -> Result<Self> {
        if !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir).map_err(|e| {
                CacheError::Storage(format!(
                    "Failed to create cache directory '{}': {}",
                    config.cache_dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { config, policy })
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Path of the entry file for a key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{key}.json"))
    }

    /// Look up the first valid entry among the candidate keys
    ///
    /// Keys are tried in the caller's priority order (typically content
    /// fingerprint first, then text fingerprint). Unparsable, quarantined,
    /// and stale entries encountered along the way are deleted as a side
    /// effect. When every candidate misses and `allow_unrelated_fallback`
    /// is enabled, all stored keys are scanned and the first valid entry is
    /// returned even though it may not correspond to the requested artifact.
    pub fn lookup(&self, candidates: &[String]) -> Option<CacheEntry> {
        for key in candidates {
            if let Some(entry) = self.load_valid(key) {
                tracing::debug!(key = %key, "Cache hit");
                return Some(entry);
            }
        }

        if self.config.allow_unrelated_fallback {
            let keys = self.keys().unwrap_or_else(|e| {
                tracing::warn!("Failed to list cache entries for fallback scan: {e}");
                Vec::new()
            });
            for key in keys {
                if candidates.contains(&key) {
                    continue;
                }
                if let Some(entry) = self.load_valid(&key) {
                    tracing::warn!(
                        key = %key,
                        "Serving best-effort fallback entry unrelated to the requested keys"
                    );
                    return Some(entry);
                }
            }
        }

        tracing::debug!(?candidates, "Cache miss");
        None
    }

    /// Write (or overwrite) the entry for a key
    ///
    /// The entry is stamped with the current time and the configured schema
    /// version, and lands via a temporary file plus rename so a concurrent
    /// reader never observes a half-written entry. A store failure is safe
    /// to log and ignore: the freshly computed result is still in hand.
    pub fn store(
        &self,
        key: &str,
        result: &str,
        visualizations: Option<Vec<Visualization>>,
    ) -> Result<()> {
        let stored = StoredEntry::new(
            result.to_string(),
            visualizations,
            &self.config.current_version,
        );

        let path = self.entry_path(key);
        let tmp = tempfile::NamedTempFile::new_in(&self.config.cache_dir).map_err(|e| {
            CacheError::Storage(format!(
                "Failed to create temporary file in '{}': {}",
                self.config.cache_dir.display(),
                e
            ))
        })?;

        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &stored)
                .map_err(|e| CacheError::Storage(format!("Failed to write cache entry: {e}")))?;
            writer
                .flush()
                .map_err(|e| CacheError::Storage(format!("Failed to flush cache entry: {e}")))?;
        }

        tmp.persist(&path).map_err(|e| {
            CacheError::Storage(format!(
                "Failed to finalize cache entry '{}': {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(key, "Stored cache entry");
        Ok(())
    }

    /// Delete every entry that can no longer become valid
    ///
    /// Removes unparsable entries, quarantined entries, entries not carrying
    /// the current schema version, and entries older than the retention
    /// limit regardless of version. Idempotent; safe to run on every
    /// request. Per-entry failures are logged and skipped.
    pub fn sweep(&self) -> Result<SweepStats> {
        let keys = self.keys()?;
        let now = Utc::now();

        let removed = keys
            .par_iter()
            .filter(|key| self.sweep_entry(key.as_str(), now))
            .count();

        Ok(SweepStats {
            examined: keys.len(),
            removed,
        })
    }

    /// List the keys of all stored entries
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let dir = fs::read_dir(&self.config.cache_dir).map_err(|e| {
            CacheError::Storage(format!(
                "Failed to read cache directory '{}': {}",
                self.config.cache_dir.display(),
                e
            ))
        })?;

        for entry in dir {
            let entry = entry
                .map_err(|e| CacheError::Storage(format!("Failed to read cache entry: {e}")))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        Ok(keys)
    }

    /// Classify every stored entry without evicting anything
    pub fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now();
        let mut stats = CacheStats::default();

        for key in self.keys()? {
            stats.total += 1;
            match self.read_entry(&key) {
                Err(_) => stats.corrupt += 1,
                Ok(entry) => match self.classify(&entry, now) {
                    EntryStatus::Valid => stats.valid += 1,
                    EntryStatus::Quarantined => stats.quarantined += 1,
                    EntryStatus::Stale => stats.stale += 1,
                },
            }
        }

        Ok(stats)
    }

    /// Load and validate a single key, evicting it on any failure
    ///
    /// Returns None if the entry is absent, unparsable, quarantined, or
    /// stale. Once evicted a key must be recomputed from scratch to become
    /// valid again.
    fn load_valid(&self, key: &str) -> Option<CacheEntry> {
        if !self.entry_path(key).exists() {
            return None;
        }

        let entry = match self.read_entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, "Removing unreadable cache entry: {e}");
                self.remove_entry(key);
                return None;
            }
        };

        match self.classify(&entry, Utc::now()) {
            EntryStatus::Valid => Some(entry),
            EntryStatus::Quarantined => {
                tracing::warn!(key, "Removing quarantined cache entry");
                self.remove_entry(key);
                None
            }
            EntryStatus::Stale => {
                tracing::debug!(
                    key,
                    version = %entry.version,
                    age_days = entry.age_days(Utc::now()),
                    "Removing stale cache entry"
                );
                self.remove_entry(key);
                None
            }
        }
    }

    /// Read and normalize the entry stored under a key
    fn read_entry(&self, key: &str) -> Result<CacheEntry> {
        let path = self.entry_path(key);
        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let stored: StoredEntry =
            serde_json::from_reader(reader).map_err(|e| CacheError::CorruptEntry {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        stored.normalize(key)
    }

    /// Apply the validity rules to a normalized entry
    ///
    /// Quarantine is checked before age and version: a denylisted result is
    /// never served no matter how fresh it is.
    fn classify(&self, entry: &CacheEntry, now: DateTime<Utc>) -> EntryStatus {
        if self.policy.is_quarantined(&entry.result) {
            return EntryStatus::Quarantined;
        }

        if entry.age_days(now) > self.config.max_age_days
            || !self.config.is_accepted_version(&entry.version)
        {
            return EntryStatus::Stale;
        }

        EntryStatus::Valid
    }

    /// Evaluate one entry for the sweep; returns true if it was removed
    fn sweep_entry(&self, key: &str, now: DateTime<Utc>) -> bool {
        let entry = match self.read_entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, "Sweep removing unreadable cache entry: {e}");
                self.remove_entry(key);
                return true;
            }
        };

        if self.policy.is_quarantined(&entry.result) {
            tracing::warn!(key, "Sweep removing quarantined cache entry");
            self.remove_entry(key);
            return true;
        }

        if entry.version != self.config.current_version {
            tracing::debug!(
                key,
                version = %entry.version,
                "Sweep removing entry with outdated version"
            );
            self.remove_entry(key);
            return true;
        }

        if entry.age_days(now) > self.config.retention_days {
            tracing::debug!(key, "Sweep removing entry past the retention limit");
            self.remove_entry(key);
            return true;
        }

        false
    }

    /// Delete the entry file for a key
    ///
    /// A missing file is a no-op: two concurrent lookups may both decide to
    /// evict the same entry. Other deletion failures are logged and ignored;
    /// the entry will be picked up again by a later lookup or sweep.
    fn remove_entry(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, "Failed to remove cache entry: {e}");
            }
        }
    }
}

/// Delete every entry in the cache directory
pub fn clear_cache(config: &CacheConfig) -> Result<()> {
    if !config.cache_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(&config.cache_dir).map_err(|e| {
        CacheError::Storage(format!(
            "Failed to read cache directory '{}': {}",
            config.cache_dir.display(),
            e
        ))
    })? {
        let entry =
            entry.map_err(|e| CacheError::Storage(format!("Failed to read cache entry: {e}")))?;

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            fs::remove_file(&path).map_err(|e| {
                CacheError::Storage(format!(
                    "Failed to remove cache entry '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
