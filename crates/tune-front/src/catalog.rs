//! Catalog search client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use tune_proto::config::CatalogConfig;
use tune_proto::model::SearchResponse;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog returned status {0}")]
    Status(u16),
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// Anything that can answer a search query with artists and recordings.
///
/// Implementations may fail and may complete in any order relative to each
/// other; the search coordinator copes with both.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, CatalogError>;
}

/// HTTP catalog: `GET {base_url}/search?q=<query>` returning
/// `{ "artists": [...], "recordings": [...] }`.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tunescout/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
        let url = self.search_url();
        debug!("catalog: GET {} q={:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}
