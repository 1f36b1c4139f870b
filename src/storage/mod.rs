//! Dedup store: the durable set of listing keys already notified.
//!
//! A key, once marked, stays marked. The store is the only state that
//! keeps delivery idempotent across restarts.
//!
//! ## Directory Structure
//!
//! ```text
//! sent/
//! ├── 8f2a91c4                  # one marker per notified key
//! ├── abc%2Fdef%2Eghi           # "abc/def.ghi", separators escaped
//! ├── %41b%43123                # "AbC123", capitals escaped
//! └── sha256~3b1e...            # keys too long for a file name
//! ```
//!
//! Marker names use only `[a-z0-9_-]`, `%XX` escapes and, for digests, a
//! single `~`. Two names that differ only in ASCII case decode to the same
//! key, so case-insensitive filesystems cannot merge distinct keys.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};

// Re-export for convenience
pub use local::FileDedupStore;
pub use memory::MemoryDedupStore;

/// Everything except `[a-z0-9_-]` is escaped, `%` and `~` included.
const MARKER_ESCAPE: &AsciiSet =
    &escape_uppercase(NON_ALPHANUMERIC.remove(b'-').remove(b'_'));

/// Longest escaped key stored verbatim; longer keys are digested.
const MAX_MARKER_LEN: usize = 200;

/// Prefix of digested names. `~` is always escaped in verbatim names.
const DIGEST_PREFIX: &str = "sha256~";

const fn escape_uppercase(set: AsciiSet) -> AsciiSet {
    let mut set = set;
    let mut byte = b'A';
    while byte <= b'Z' {
        set = set.add(byte);
        byte += 1;
    }
    set
}

/// Trait for dedup store backends.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Whether `key` has already been recorded as notified.
    ///
    /// Never reports a key that was not marked.
    async fn has_been_notified(&self, key: &str) -> Result<bool>;

    /// Durably record `key`. Marking twice is a no-op.
    ///
    /// On error the key is not considered marked.
    async fn mark_notified(&self, key: &str) -> Result<()>;

    /// Number of keys recorded so far.
    async fn notified_count(&self) -> Result<usize>;
}

/// Map an identity key to a storage-safe marker name.
///
/// The mapping is injective even when names are compared ignoring ASCII
/// case: distinct keys never share a marker. The result never contains a
/// path separator or a `.`.
pub fn marker_name(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(AppError::validation("identity key is empty"));
    }

    let escaped = utf8_percent_encode(key, MARKER_ESCAPE).to_string();
    if escaped.len() <= MAX_MARKER_LEN {
        return Ok(escaped);
    }

    let digest = Sha256::digest(key.as_bytes());
    Ok(format!("{}{}", DIGEST_PREFIX, hex::encode(digest)))
}

/// Whether a directory entry name could have come from [`marker_name`].
pub fn is_marker_name(name: &str) -> bool {
    if let Some(hex) = name.strip_prefix(DIGEST_PREFIX) {
        return hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    !name.is_empty()
        && name.len() <= MAX_MARKER_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'%'))
}
