//! Content quarantine policies
//!
//! A quarantined entry is one whose stored result matches a disallowed
//! pattern; it must never be served and is deleted on detection,
//! independent of age or version. The predicate is injectable so the
//! denylist can evolve without touching cache mechanics.

/// Decides whether a stored result is disallowed
pub trait QuarantinePolicy: Send + Sync {
    /// True if the result must not be served
    fn is_quarantined(&self, result: &str) -> bool;
}

/// Default phrases quarantined by [`DenylistPolicy`]
///
/// These mark results contaminated by an off-topic prompt regression in the
/// upstream analysis pipeline.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "interview-ready",
    "job application",
    "hiring manager",
    "career",
    "resume",
];

/// Case-insensitive substring denylist
pub struct DenylistPolicy {
    phrases: Vec<String>,
}

impl DenylistPolicy {
    /// Create a policy from explicit phrases (matched case-insensitively)
    pub fn new(phrases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }
}

impl Default for DenylistPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

impl QuarantinePolicy for DenylistPolicy {
    fn is_quarantined(&self, result: &str) -> bool {
        let lowered = result.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p))
    }
}
