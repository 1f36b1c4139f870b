//! Inventory item data structure.

use serde::{Deserialize, Serialize};

/// A listing returned by one inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Paint codes (e.g. `RED`)
    #[serde(rename = "PAINT", default)]
    pub paint: Vec<String>,

    /// Additional option codes
    #[serde(rename = "ADL_OPTS", default)]
    pub options: Vec<String>,

    /// Metro area the listing is offered in
    #[serde(rename = "MetroName", default)]
    pub metro: String,

    /// Source-assigned identifier, stable across polls
    #[serde(rename = "Hash", default)]
    pub hash: String,
}

/// Top-level inventory API response.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InventoryResponse {
    #[serde(default)]
    pub results: Vec<Item>,
}

impl Item {
    /// Identity key used as the dedup unit.
    pub fn identity_key(&self) -> &str {
        &self.hash
    }

    /// Format item for display using a template.
    ///
    /// Supported placeholders:
    /// - `{metro}`, `{key}`
    /// - `{paint}`, `{options}` (comma-separated)
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{metro}", &self.metro)
            .replace("{key}", &self.hash)
            .replace("{paint}", &self.paint.join(", "))
            .replace("{options}", &self.options.join(", "))
    }
}
