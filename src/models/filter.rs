//! Relevance predicate over an item's tag sets.

use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Filter deciding which listings are worth an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemFilter {
    /// Item must carry at least one of these paints (any paint if empty)
    #[serde(default = "defaults::paints")]
    pub paints: Vec<String>,

    /// Item must carry none of these options
    #[serde(default = "defaults::excluded_options")]
    pub excluded_options: Vec<String>,
}

impl ItemFilter {
    /// Whether `item` is relevant.
    pub fn matches(&self, item: &Item) -> bool {
        let paint_ok =
            self.paints.is_empty() || self.paints.iter().any(|p| item.paint.contains(p));
        let options_ok = !self
            .excluded_options
            .iter()
            .any(|o| item.options.contains(o));

        paint_ok && options_ok
    }
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            paints: defaults::paints(),
            excluded_options: defaults::excluded_options(),
        }
    }
}

mod defaults {
    pub fn paints() -> Vec<String> {
        vec!["RED".into()]
    }
    pub fn excluded_options() -> Vec<String> {
        vec!["PERFORMANCE_UPGRADE".into()]
    }
}
