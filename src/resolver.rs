//! Background resolver - identifier to image URL.
//!
//! Only `image_url` is consumed by the editor; the rest of the metadata is
//! carried through for hosts that show it.

use crate::constants::HTTP_USER_AGENT;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Metadata describing a background.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NftMetadata {
    pub image_url: String,
    pub display_name: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<Value>,
}

/// Turns a user-entered identifier into background metadata.
pub trait BackgroundResolver: Send + Sync {
    fn resolve(&self, identifier: &str) -> Result<NftMetadata>;
}

fn not_found(identifier: &str) -> Error {
    Error::NotFound {
        identifier: identifier.to_string(),
    }
}

/// Extract metadata from a marketplace `{"nft": {...}}` response body.
///
/// The image is taken from `image_url`, then `display_image_url`, then
/// `image`. A response without any of them resolves to nothing.
pub fn parse_metadata(identifier: &str, body: &Value) -> Result<NftMetadata> {
    let nft = body.get("nft").unwrap_or(body);
    let text = |key: &str| nft.get(key).and_then(Value::as_str).filter(|value| !value.is_empty());

    let image_url = ["image_url", "display_image_url", "image"]
        .into_iter()
        .find_map(text)
        .ok_or_else(|| not_found(identifier))?;

    Ok(NftMetadata {
        image_url: image_url.to_string(),
        display_name: text("name").map_or_else(|| format!("#{}", identifier), str::to_string),
        description: text("description").unwrap_or_default().to_string(),
        attributes: nft
            .get("traits")
            .or_else(|| nft.get("attributes"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    })
}

/// HTTP metadata lookup: `GET {endpoint}/{identifier}`.
pub struct MetadataResolver {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl MetadataResolver {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    fn url_for(&self, identifier: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(identifier)
        )
    }
}

impl BackgroundResolver for MetadataResolver {
    fn resolve(&self, identifier: &str) -> Result<NftMetadata> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(not_found(identifier));
        }

        let url = self.url_for(identifier);
        debug!(url = %url, "Resolving background metadata");
        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(ref key) = self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request.send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(not_found(identifier)),
            status if !status.is_success() => Err(Error::Fetch(format!(
                "Metadata lookup failed: HTTP {}",
                status.as_u16()
            ))),
            _ => {
                let body: Value = serde_json::from_slice(&response.bytes()?)?;
                parse_metadata(identifier, &body)
            }
        }
    }
}

/// Fixed identifier table for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, NftMetadata>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: impl Into<String>, metadata: NftMetadata) -> Self {
        self.entries.insert(identifier.into(), metadata);
        self
    }

    /// Register an identifier that resolves straight to `image_url`.
    pub fn with_image(self, identifier: impl Into<String>, image_url: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let metadata = NftMetadata {
            image_url: image_url.into(),
            display_name: format!("#{}", identifier),
            ..NftMetadata::default()
        };
        self.with(identifier, metadata)
    }
}

impl BackgroundResolver for StaticResolver {
    fn resolve(&self, identifier: &str) -> Result<NftMetadata> {
        self.entries
            .get(identifier.trim())
            .cloned()
            .ok_or_else(|| not_found(identifier))
    }
}
