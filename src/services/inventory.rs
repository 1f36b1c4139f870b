// src/services/inventory.rs

//! Inventory API client.
//!
//! Issues one `GET <endpoint>?query=<json>` per cycle and returns the
//! decoded snapshot.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{InventoryResponse, Item, SourceConfig};
use crate::services::InventorySource;
use crate::utils::http::create_async_client;

/// HTTP-backed inventory source.
pub struct InventoryClient {
    config: SourceConfig,
    client: Client,
    url: Url,
}

impl InventoryClient {
    /// Create a client for the configured search.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = create_async_client(&config)?;
        let url = query_url(&config)?;
        Ok(Self {
            config,
            client,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Build the search URL with the JSON query in the `query` parameter.
fn query_url(config: &SourceConfig) -> Result<Url> {
    let query = json!({
        "query": {
            "model": config.model,
            "condition": config.condition,
            "options": {},
            "arrangeby": "Price",
            "order": "asc",
            "market": config.market,
            "language": config.language,
            "super_region": config.super_region,
            "lng": config.lng,
            "lat": config.lat,
            "zip": config.zip,
            "range": config.range,
            "region": config.region,
        },
        "offset": 0,
        "count": config.count,
        "outsideOffset": 0,
        "outsideSearch": config.outside_search,
    });

    let query = serde_json::to_string(&query)?;
    Ok(Url::parse_with_params(&config.endpoint, &[("query", query)])?)
}

/// Decode a response body into listings.
fn decode(body: &[u8]) -> Result<Vec<Item>> {
    let response: InventoryResponse =
        serde_json::from_slice(body).map_err(|e| AppError::fetch("inventory response", e))?;
    Ok(response.results)
}

#[async_trait]
impl InventorySource for InventoryClient {
    async fn fetch(&self) -> Result<Vec<Item>> {
        let context = self.config.endpoint.as_str();

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AppError::fetch(context, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(context, format!("HTTP status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(context, e))?;

        let items = decode(&body)?;
        log::debug!("Fetched {} listings from {}", items.len(), context);
        Ok(items)
    }
}
