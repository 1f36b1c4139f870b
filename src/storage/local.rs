//! Local filesystem dedup store.
//!
//! One marker file per notified key, named by [`marker_name`]. A marker's
//! existence is the record; its content is the time it was written.
//!
//! Markers are written to `<name>.tmp` and renamed into place, so a crash
//! or failed write never leaves a marker that was not fully recorded.
//! Marker names never contain `.`, so temporary files are never mistaken
//! for markers. Only regular files with marker names are counted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{DedupStore, is_marker_name, marker_name};

const TMP_SUFFIX: &str = ".tmp";

/// File-per-key dedup store.
#[derive(Debug, Clone)]
pub struct FileDedupStore {
    root_dir: PathBuf,
}

impl FileDedupStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created on first mark.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the marker path for a key.
    fn path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root_dir.join(marker_name(key)?))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_marker(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl DedupStore for FileDedupStore {
    async fn has_been_notified(&self, key: &str) -> Result<bool> {
        let path = self.path(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::storage(key, e)),
        }
    }

    async fn mark_notified(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        if self.has_been_notified(key).await? {
            log::debug!("Key {} already marked", key);
            return Ok(());
        }

        let stamp = Utc::now().to_rfc3339();
        self.write_marker(&path, stamp.as_bytes())
            .await
            .map_err(|e| AppError::storage(key, e))?;

        log::debug!("Marked {} at {}", key, path.display());
        Ok(())
    }

    async fn notified_count(&self) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if is_marker_name(name) => count += 1,
                _ => log::debug!("Ignoring stray entry {}", entry.path().display()),
            }
        }
        Ok(count)
    }
}
