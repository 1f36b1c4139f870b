//! Test doubles for the cycle collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::Item;
use crate::services::{InventorySource, Notifier};
use crate::storage::{DedupStore, MemoryDedupStore};

pub fn item(key: &str, paint: &[&str], options: &[&str]) -> Item {
    Item {
        paint: paint.iter().map(|s| s.to_string()).collect(),
        options: options.iter().map(|s| s.to_string()).collect(),
        metro: "Irvine".into(),
        hash: key.into(),
    }
}

fn fetch_error() -> AppError {
    AppError::fetch("test source", "connection refused")
}

/// Returns the same snapshot (or the same failure) every call.
pub struct StaticSource {
    items: Option<Vec<Item>>,
}

impl StaticSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items: Some(items) }
    }

    pub fn failing() -> Self {
        Self { items: None }
    }
}

#[async_trait]
impl InventorySource for StaticSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        self.items.clone().ok_or_else(fetch_error)
    }
}

/// Plays back one scripted response per call; `None` is a fetch failure.
/// Once the script runs out every call returns an empty snapshot.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Option<Vec<Item>>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Option<Vec<Item>>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventorySource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Some(items)) => Ok(items),
            Some(None) => Err(fetch_error()),
            None => Ok(Vec::new()),
        }
    }
}

/// Records every delivered key.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, item: &Item) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(item.identity_key().to_string());
        Ok(())
    }
}

/// Fails delivery for one key, succeeds for the rest.
pub struct FlakyNotifier {
    fail_on: String,
    attempted: Mutex<Vec<String>>,
}

impl FlakyNotifier {
    pub fn failing_on(key: &str) -> Self {
        Self {
            fail_on: key.to_string(),
            attempted: Mutex::default(),
        }
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FlakyNotifier {
    async fn notify(&self, item: &Item) -> Result<()> {
        let key = item.identity_key();
        self.attempted.lock().unwrap().push(key.to_string());
        if key == self.fail_on {
            return Err(AppError::notify(key, "550 mailbox unavailable"));
        }
        Ok(())
    }
}

/// Memory store with injected faults.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryDedupStore,
    check_fails_for: Option<String>,
    mark_fails: bool,
}

impl FailingStore {
    pub fn check_fails_for(key: &str) -> Self {
        Self {
            check_fails_for: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn mark_fails() -> Self {
        Self {
            mark_fails: true,
            ..Self::default()
        }
    }
}

fn denied(key: &str) -> AppError {
    AppError::storage(
        key,
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
    )
}

#[async_trait]
impl DedupStore for FailingStore {
    async fn has_been_notified(&self, key: &str) -> Result<bool> {
        if self.check_fails_for.as_deref() == Some(key) {
            return Err(denied(key));
        }
        self.inner.has_been_notified(key).await
    }

    async fn mark_notified(&self, key: &str) -> Result<()> {
        if self.mark_fails {
            return Err(denied(key));
        }
        self.inner.mark_notified(key).await
    }

    async fn notified_count(&self) -> Result<usize> {
        self.inner.notified_count().await
    }
}
