//! Stack Exchange `/tags` client.

use crate::TagSource;
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tagrank_core::config::SourceConfig;
use tagrank_core::{NewTag, RawTag, normalize};

/// Response wrapper returned by every Stack Exchange API method.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Option<Vec<RawTag>>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    quota_remaining: Option<i64>,
}

/// Tag source backed by the Stack Exchange API.
#[derive(Clone, Debug)]
pub struct StackExchangeSource {
    http: reqwest::Client,
    endpoint: Url,
}

impl StackExchangeSource {
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        config.validate().map_err(SourceError::Config)?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| SourceError::Config(format!("invalid source endpoint: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .gzip(true)
            .build()
            .map_err(|e| SourceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TagSource for StackExchangeSource {
    async fn fetch_tags(&self) -> SourceResult<Vec<NewTag>> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching tags");

        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        let body = response.text().await.map_err(SourceError::from_body_read)?;

        if !status.is_success() {
            return Err(SourceError::remote(status.as_u16(), &body));
        }

        let items = parse_listing(&body)?;
        let tags = normalize(items);
        tracing::info!(count = tags.len(), "Fetched tag batch");
        Ok(tags)
    }
}

/// Extract the raw items from a response body.
///
/// A `null` body or a missing, `null` or empty `items` array yields an empty
/// list; anything that is not the expected JSON shape is an error.
fn parse_listing(body: &str) -> SourceResult<Vec<RawTag>> {
    let envelope: Option<Envelope> = serde_json::from_str(body)?;

    let Some(envelope) = envelope else {
        tracing::warn!("Tag source returned a null body; treating as an empty batch");
        return Ok(Vec::new());
    };

    if envelope.quota_remaining.is_some() || envelope.has_more.is_some() {
        tracing::debug!(
            quota_remaining = ?envelope.quota_remaining,
            has_more = ?envelope.has_more,
            "Tag source quota"
        );
    }

    match envelope.items {
        Some(items) if !items.is_empty() => Ok(items),
        _ => {
            tracing::warn!("Tag source returned no items; treating as an empty batch");
            Ok(Vec::new())
        }
    }
}
