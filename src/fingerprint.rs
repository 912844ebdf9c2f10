//! Artifact fingerprinting
//!
//! Two independent key derivations for the same uploaded artifact:
//!
//! - a *content fingerprint* over the raw bytes, stable across re-uploads
//!   of the same file regardless of filename;
//! - a *text fingerprint* over a normalized, order-insensitive reduction of
//!   the extracted text, stable across extraction noise and reformatting
//!   between runs on the same logical document.
//!
//! Both produce a SHA-256 hex digest. Fingerprints are computed per request
//! and never persisted; the cache stores entries under whichever key the
//! caller chose.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Number of meaningful words folded into the text fingerprint
const KEY_WORD_COUNT: usize = 500;

/// Minimum word length considered meaningful
const MIN_WORD_LEN: usize = 4;

/// Characters of raw text hashed when normalization yields nothing
const FALLBACK_PREFIX_CHARS: usize = 1000;

/// Page markers injected by text extraction, e.g. `=== page 12 ===`
static PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=== page \d+ ===").expect("valid page marker regex"));

fn digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the content fingerprint of raw artifact bytes
///
/// Identical bytes always yield the identical key; any difference yields an
/// unrelated key.
pub fn content_fingerprint(bytes: &[u8]) -> String {
    digest(bytes)
}

/// Compute the content fingerprint of a file on disk
///
/// Never fails: if the file cannot be read, falls back to a digest of
/// `"{filename}_{filesize}"`, and if the size cannot be read either, to a
/// digest of the path string. Every fallback still produces a
/// valid-format key.
pub fn content_fingerprint_for_file(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => digest(&bytes),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "Failed to read artifact for fingerprinting, using fallback key: {e}"
            );
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            match std::fs::metadata(path) {
                Ok(meta) => digest(format!("{}_{}", filename, meta.len()).as_bytes()),
                Err(_) => digest(path.to_string_lossy().as_bytes()),
            }
        }
    }
}

/// Compute the text fingerprint of extracted document text
///
/// The text is normalized so that incidental reformatting or re-extraction
/// differences produce the same key: lowercased, page markers removed,
/// punctuation flattened, then reduced to the first 500 meaningful words
/// sorted lexicographically. Two documents sharing that vocabulary are
/// indistinguishable to this key.
pub fn text_fingerprint(text: &str) -> String {
    let words = meaningful_words(text);
    if words.is_empty() {
        // Nothing survived normalization; hash a raw prefix instead so the
        // key is still deterministic for this input.
        let prefix: String = text.chars().take(FALLBACK_PREFIX_CHARS).collect();
        return digest(prefix.as_bytes());
    }

    let mut key_words: Vec<String> = words.into_iter().take(KEY_WORD_COUNT).collect();
    key_words.sort_unstable();
    digest(key_words.join(" ").as_bytes())
}

/// Reduce text to its meaningful words, in original order
///
/// Lowercases, strips page markers, replaces every character that is not an
/// ASCII letter, digit, or whitespace with a space, then drops words shorter
/// than four characters and purely numeric words.
fn meaningful_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = PAGE_MARKER.replace_all(lowered.trim(), "");

    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.len() >= MIN_WORD_LEN && !w.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}
