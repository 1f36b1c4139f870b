//! Service layer: the collaborators a poll cycle talks to.
//!
//! - Inventory snapshots (`InventoryClient`)
//! - Operator alerts (`EmailNotifier`)

mod email;
mod inventory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Item;

pub use email::EmailNotifier;
pub use inventory::InventoryClient;

/// Source of complete inventory snapshots.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch the full current listing set (not a diff).
    async fn fetch(&self) -> Result<Vec<Item>>;
}

/// Delivers one human-readable alert per item.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an alert for `item`, failing loudly rather than dropping it.
    async fn notify(&self, item: &Item) -> Result<()>;
}
