// src/pipeline/schedule.rs

//! Fixed-interval scheduler around [`run_cycle`].

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::models::{CycleReport, ItemFilter};
use crate::pipeline::run_cycle;
use crate::services::{InventorySource, Notifier};
use crate::storage::DedupStore;

/// A source, filter, store and notifier wired together.
pub struct Watcher {
    source: Box<dyn InventorySource>,
    filter: ItemFilter,
    store: Box<dyn DedupStore>,
    notifier: Box<dyn Notifier>,
}

impl Watcher {
    pub fn new(
        source: impl InventorySource + 'static,
        filter: ItemFilter,
        store: impl DedupStore + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            filter,
            store: Box::new(store),
            notifier: Box::new(notifier),
        }
    }

    /// Run one cycle.
    pub async fn run_once(&self) -> Result<CycleReport> {
        run_cycle(
            self.source.as_ref(),
            &self.filter,
            self.store.as_ref(),
            self.notifier.as_ref(),
        )
        .await
    }

    /// Run cycles until `exit` resolves, returning the number of cycles run.
    ///
    /// Each cycle is followed by a pause of `interval`, regardless of how
    /// long the cycle took. Cycle errors are logged and never end the loop.
    /// `exit` only interrupts the pause; a started cycle always finishes.
    pub async fn serve<F>(&self, interval: Duration, exit: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(exit);
        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            log::debug!("Starting cycle {}", cycle);

            match self.run_once().await {
                Ok(report) => log::info!(
                    "Cycle {}: {} fetched, {} matched, {} new, {} already notified, {} skipped",
                    cycle,
                    report.fetched,
                    report.matched,
                    report.notified,
                    report.already_notified,
                    report.check_failures
                ),
                Err(e) => log::error!("Cycle {} failed: {}", cycle, e),
            }

            tokio::select! {
                biased;
                _ = &mut exit => {
                    log::info!("Shutdown requested; stopping after cycle {}", cycle);
                    return cycle;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::pipeline::testing::{RecordingNotifier, ScriptedSource, item};
    use crate::pipeline::shutdown::{self, ShutdownTrigger};
    use crate::storage::MemoryDedupStore;
    use async_trait::async_trait;

    const INTERVAL: Duration = Duration::from_secs(15);

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_does_not_stop_loop() {
        let source = ScriptedSource::new(vec![None, Some(vec![item("a", &["RED"], &[])])]);
        let notifier = RecordingNotifier::new();

        let watcher = Watcher::new(
            source.clone(),
            ItemFilter::default(),
            MemoryDedupStore::new(),
            notifier.clone(),
        );

        // Cycles start at t=0 (fails) and t=15; exit lands in the second pause.
        let cycles = watcher
            .serve(INTERVAL, tokio::time::sleep(Duration::from_secs(25)))
            .await;

        assert_eq!(cycles, 2);
        assert_eq!(source.calls(), 2);
        assert_eq!(notifier.sent(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_exit_still_completes_first_cycle() {
        let source = ScriptedSource::new(vec![Some(vec![item("a", &["RED"], &[])])]);
        let notifier = RecordingNotifier::new();
        let watcher = Watcher::new(
            source.clone(),
            ItemFilter::default(),
            MemoryDedupStore::new(),
            notifier.clone(),
        );

        let cycles = watcher.serve(INTERVAL, std::future::ready(())).await;

        assert_eq!(cycles, 1);
        assert_eq!(notifier.sent(), vec!["a"]);
    }

    /// Takes ten seconds per fetch.
    struct SlowSource(ScriptedSource);

    #[async_trait]
    impl InventorySource for SlowSource {
        async fn fetch(&self) -> Result<Vec<Item>> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            self.0.fetch().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_follows_cycle_end_and_exit_waits_for_cycle() {
        let inner = ScriptedSource::default();
        let watcher = Watcher::new(
            SlowSource(inner.clone()),
            ItemFilter::default(),
            MemoryDedupStore::new(),
            RecordingNotifier::new(),
        );

        // Cycle 1 runs t=0..10, pause to t=25, cycle 2 runs t=25..35.
        // Exit at t=30 lands mid-cycle and is honored once cycle 2 ends.
        let started = tokio::time::Instant::now();
        let cycles = watcher
            .serve(INTERVAL, tokio::time::sleep(Duration::from_secs(30)))
            .await;

        assert_eq!(cycles, 2);
        assert_eq!(inner.calls(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(35), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(36), "{elapsed:?}");
    }

    /// Requests shutdown from inside delivery, then records the key.
    struct TriggeringNotifier {
        trigger: ShutdownTrigger,
        inner: RecordingNotifier,
    }

    #[async_trait]
    impl Notifier for TriggeringNotifier {
        async fn notify(&self, item: &Item) -> Result<()> {
            self.trigger.trigger();
            tokio::time::sleep(Duration::from_secs(1)).await;
            self.inner.notify(item).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_first_cycle_lets_it_finish() {
        let (trigger, shutdown) = shutdown::channel();
        let source = ScriptedSource::new(vec![Some(vec![
            item("a", &["RED"], &[]),
            item("b", &["RED"], &[]),
        ])]);
        let sent = RecordingNotifier::new();
        let store = MemoryDedupStore::new();
        let watcher = Watcher::new(
            source.clone(),
            ItemFilter::default(),
            store,
            TriggeringNotifier {
                trigger,
                inner: sent.clone(),
            },
        );

        let cycles = watcher.serve(INTERVAL, shutdown.wait()).await;

        assert_eq!(cycles, 1);
        assert_eq!(source.calls(), 1);
        assert_eq!(sent.sent(), vec!["a", "b"]);
        assert_eq!(watcher.store.notified_count().await.unwrap(), 2);
    }
}
