//! In-process dedup store.
//!
//! Forgets everything on exit; used for tests and single-shot runs where
//! restart durability does not matter.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{DedupStore, marker_name};

/// Dedup store backed by a `HashSet` of marker names.
#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    keys: Mutex<HashSet<String>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `keys`.
    pub fn with_keys<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for key in keys {
            set.insert(marker_name(key.as_ref())?);
        }
        Ok(Self {
            keys: Mutex::new(set),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A panicked holder cannot leave the set half-updated.
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn has_been_notified(&self, key: &str) -> Result<bool> {
        let name = marker_name(key)?;
        Ok(self.lock().contains(&name))
    }

    async fn mark_notified(&self, key: &str) -> Result<()> {
        let name = marker_name(key)?;
        self.lock().insert(name);
        Ok(())
    }

    async fn notified_count(&self) -> Result<usize> {
        Ok(self.lock().len())
    }
}
