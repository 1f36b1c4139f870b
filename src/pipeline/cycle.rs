// src/pipeline/cycle.rs

//! One poll cycle: fetch, filter, and notify-then-mark each new listing.

use crate::error::Result;
use crate::models::{CycleReport, ItemFilter};
use crate::services::{InventorySource, Notifier};
use crate::storage::DedupStore;

/// Run a single cycle over the current snapshot.
///
/// - A fetch failure fails the cycle before any listing is touched.
/// - A failed store check skips that listing only.
/// - A failed notification stops the cycle; later listings wait for the
///   next one, unmarked.
/// - A failed mark after a sent notification is returned; that listing may
///   be notified again next cycle.
pub async fn run_cycle(
    source: &dyn InventorySource,
    filter: &ItemFilter,
    store: &dyn DedupStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport> {
    let items = source.fetch().await?;

    let mut report = CycleReport {
        fetched: items.len(),
        ..CycleReport::default()
    };

    let matching: Vec<_> = items.iter().filter(|item| filter.matches(item)).collect();
    report.matched = matching.len();

    if matching.is_empty() {
        log::info!("No results ({} listings fetched)", report.fetched);
        return Ok(report);
    }

    for item in matching {
        let key = item.identity_key();

        match store.has_been_notified(key).await {
            Ok(true) => {
                report.already_notified += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("Skipping listing {}: {}", key, e);
                report.check_failures += 1;
                continue;
            }
        }

        notifier.notify(item).await?;

        if let Err(e) = store.mark_notified(key).await {
            log::error!(
                "Listing {} was notified but could not be recorded; it may be notified again: {}",
                key,
                e
            );
            return Err(e);
        }

        log::info!("Notified and recorded listing {}", key);
        report.notified += 1;
    }

    Ok(report)
}
