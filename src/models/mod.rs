// src/models/mod.rs

//! Domain models for the watcher.

mod config;
mod filter;
mod item;

// Re-export all public types
pub use config::{Config, EmailConfig, ScheduleConfig, SourceConfig, StoreConfig};
pub use filter::ItemFilter;
pub use item::{InventoryResponse, Item};

/// Counters collected over one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Items in the snapshot
    pub fetched: usize,
    /// Items passing the filter
    pub matched: usize,
    /// Matching items whose key was already recorded
    pub already_notified: usize,
    /// Items notified and recorded this cycle
    pub notified: usize,
    /// Matching items skipped because the store check failed
    pub check_failures: usize,
}
